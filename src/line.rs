use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Price;

/// Classification of a trendline by how price historically interacted
/// with it.
///
/// Variant order is the ranking tie-break order.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Price bounced above the line, fitted through swing lows.
    Support,
    /// Price bounced below the line, fitted through swing highs.
    Resistance,
    /// Price crossed through the line at least once.
    Cross,
}

impl Direction {
    pub(crate) const ALL: [Self; 3] = [Self::Support, Self::Resistance, Self::Cross];

    #[inline]
    pub(crate) fn ordinal(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Resistance => "resistance",
            Self::Cross => "cross",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Straight line with price as a function of bar index.
///
/// ```text
/// price(index) = slope × index + intercept
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    slope: f64,
    intercept: Price,
}

impl Line {
    #[must_use]
    pub fn new(slope: f64, intercept: Price) -> Self {
        Self { slope, intercept }
    }

    /// Exact fit through two points at distinct indices.
    ///
    /// Returns `None` when both points share an index.
    #[must_use]
    pub fn through(a: (usize, Price), b: (usize, Price)) -> Option<Self> {
        if a.0 == b.0 {
            return None;
        }

        let (x1, x2) = (index_to_f64(a.0), index_to_f64(b.0));
        let slope = (b.1 - a.1) / (x2 - x1);

        Some(Self {
            slope,
            intercept: a.1 - slope * x1,
        })
    }

    /// Price change per bar.
    #[inline]
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Projected price at index `0`.
    #[inline]
    #[must_use]
    pub fn intercept(&self) -> Price {
        self.intercept
    }

    /// Projected price at bar `index`.
    #[inline]
    #[must_use]
    pub fn value_at(&self, index: usize) -> Price {
        self.value_at_x(index_to_f64(index))
    }

    #[inline]
    pub(crate) fn value_at_x(&self, x: f64) -> Price {
        self.slope.mul_add(x, self.intercept)
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line({} × i + {})", self.slope, self.intercept)
    }
}

#[allow(clippy::cast_precision_loss)]
#[inline]
pub(crate) fn index_to_f64(index: usize) -> f64 {
    index as f64
}
