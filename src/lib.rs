//! Trendline detection for OHLCV price series.
//!
//! Given a date-ordered series of bars, [`TrendlineDetector`] finds the
//! straight lines price repeatedly respects: support under the swing lows,
//! resistance over the swing highs, and cross lines that price has broken
//! through. Each line is scored by how many bars touch it within a relative
//! tolerance, near-duplicates are merged, and the most significant lines
//! are returned first.
//!
//! Series are accepted as any slice of a type implementing [`Ohlcv`]. The
//! pipeline stages ([`extract_pivots`], [`generate_candidates`],
//! [`score_candidates`], [`rank`]) are public for callers that want to
//! inspect intermediate results.
//!
//! ```
//! use chrono::{Days, NaiveDate};
//! use quantedge_trendlines::{Bar, Interval, TrendlineDetector};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let bars: Vec<Bar> = (0..50)
//!     .map(|i| Bar::new(start + Days::new(i), 100.0, 100.0, 100.0, 100.0))
//!     .collect();
//!
//! let report = TrendlineDetector::default()
//!     .report("FLAT", Interval::Daily, &bars)
//!     .unwrap();
//!
//! assert_eq!(report.trendlines.len(), 2);
//! assert_eq!(report.trendlines[0].touch_count, 50);
//! ```

#[cfg(feature = "parallel")]
mod batch;
mod candidate;
mod config;
mod detector;
mod error;
mod interval;
mod line;
mod ohlcv;
mod pivot;
mod rank;
mod series;
mod touch;
mod trendline;

pub use crate::config::{
    PointSpan, Tolerance, TrendlineConfig, TrendlineConfigBuilder, TrendlineOptions,
};
pub use crate::error::{ConfigError, InputError, ParseIntervalError, TrendlineError};
pub use crate::interval::Interval;
pub use crate::ohlcv::{Bar, Ohlcv, Price};

pub use crate::candidate::{LineCandidate, generate_candidates};
pub use crate::line::{Direction, Line};
pub use crate::pivot::{Pivot, PivotKind, extract_pivots};
pub use crate::rank::rank;
pub use crate::series::validate_series;
pub use crate::touch::{ScoredCandidate, Touches, evaluate, score_candidates};

pub use crate::detector::{TrendlineDetector, TrendlineReport, detect_trendlines};
pub use crate::trendline::{TrendPoint, Trendline, TrendlineData};

#[cfg(feature = "parallel")]
pub use crate::batch::SeriesRequest;

#[cfg(test)]
mod test_util;
