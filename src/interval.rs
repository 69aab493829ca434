use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ParseIntervalError;

/// Bar interval of a series, using the provider's notation.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, Serialize, Deserialize)]
pub enum Interval {
    /// One bar per trading day (`"1d"`).
    #[default]
    #[serde(rename = "1d")]
    Daily,
    /// One bar per week (`"1wk"`).
    #[serde(rename = "1wk")]
    Weekly,
    /// One bar per month (`"1mo"`).
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    /// Provider notation for this interval.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ParseIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Self::Daily),
            "1wk" => Ok(Self::Weekly),
            "1mo" => Ok(Self::Monthly),
            other => Err(ParseIntervalError(other.to_owned())),
        }
    }
}
