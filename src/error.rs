use chrono::NaiveDate;
use thiserror::Error;

use crate::Price;

/// Errors returned by trendline detection.
///
/// A series that is too short or too flat to produce pivots is not an error:
/// detection returns an empty trendline list in that case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendlineError {
    /// The input series violates the ordering or price invariants.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// A tuning knob is out of range.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
}

/// Input series violations, each carrying the offending bar index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("bar {index} at {current} precedes previous bar at {previous}")]
    NotAscending {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("bar {index} repeats date {date}")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("bar {index} has low {low} above high {high}")]
    InvertedRange { index: usize, low: Price, high: Price },

    #[error("bar {index} has non-positive or non-finite {field}: {value}")]
    NonPositivePrice {
        index: usize,
        field: &'static str,
        value: Price,
    },

    #[error("bar {index} has {field} {value} outside its low..high range")]
    OutsideRange {
        index: usize,
        field: &'static str,
        value: Price,
    },
}

/// Out-of-range configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("pivot window must be at least 1")]
    ZeroPivotWindow,

    #[error("touch tolerance must be a finite percentage in (0, 100), got {0}")]
    Tolerance(f64),

    #[error("minimum touch count must be at least 2, got {0}")]
    MinTouchCount(usize),

    #[error("max lines per direction must be at least 1")]
    ZeroLineCap,

    #[error("slope similarity must be in (0, 1), got {0}")]
    SlopeSimilarity(f64),
}

/// Unrecognized interval notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interval {0:?}, expected one of 1d, 1wk, 1mo")]
pub struct ParseIntervalError(pub String);
