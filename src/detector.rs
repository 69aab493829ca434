use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Interval, Ohlcv, Trendline, TrendlineConfig, TrendlineData, TrendlineError, TrendlineOptions,
    extract_pivots, generate_candidates, rank, score_candidates, validate_series,
};

/// Trendlines found for one symbol, ready to be serialized for the chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendlineReport {
    pub symbol: String,
    pub interval: Interval,
    pub trendlines: Vec<TrendlineData>,
}

/// Trendline detection engine.
///
/// Runs the full pipeline on a price series: validation, pivot extraction,
/// candidate generation, touch evaluation, deduplication and ranking. Holds
/// only its configuration; each call is a pure function of its input, so a
/// detector can be shared freely across threads.
///
/// # Example
///
/// ```
/// use chrono::{Days, NaiveDate};
/// use quantedge_trendlines::{Bar, Direction, TrendlineConfig, TrendlineDetector};
///
/// // Price oscillating between 90 and 110 with a 10-bar period.
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let bars: Vec<Bar> = (0..60_u32)
///     .map(|i| {
///         let phase = f64::from(i % 10);
///         let mid = 100.0 + 10.0 * (phase - 5.0).abs() / 5.0 - 5.0;
///         Bar::new(start + Days::new(u64::from(i)), mid, mid + 5.0, mid - 5.0, mid)
///     })
///     .collect();
///
/// let detector = TrendlineDetector::new(TrendlineConfig::default());
/// let trendlines = detector.detect(&bars).unwrap();
///
/// assert!(trendlines.iter().any(|t| t.direction() == Direction::Support));
/// assert!(trendlines.iter().all(|t| t.touch_count() >= 3));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrendlineDetector {
    config: TrendlineConfig,
}

impl TrendlineDetector {
    #[must_use]
    pub fn new(config: TrendlineConfig) -> Self {
        Self { config }
    }

    /// Builds a detector from options received at the HTTP boundary.
    ///
    /// # Errors
    ///
    /// Returns [`TrendlineError::Configuration`] when an option is out of
    /// range.
    pub fn from_options(options: TrendlineOptions) -> Result<Self, TrendlineError> {
        Ok(Self::new(TrendlineConfig::try_from(options)?))
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &TrendlineConfig {
        &self.config
    }

    /// Detects trendlines in `bars`, most significant first.
    ///
    /// A series too short or too flat to produce pivots yields an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`TrendlineError::InvalidInput`] when the series is not
    /// strictly ascending by date or a bar has inconsistent prices. No
    /// detection work happens in that case.
    pub fn detect(&self, bars: &[impl Ohlcv]) -> Result<Vec<Trendline>, TrendlineError> {
        validate_series(bars)?;

        let pivots = extract_pivots(bars, self.config.pivot_window());
        let candidates = generate_candidates(&pivots, bars);
        let candidate_count = candidates.len();
        let scored = score_candidates(candidates, bars, &self.config);
        let survivors = scored.len();
        let trendlines = rank(scored, bars, &self.config);

        debug!(
            bars = bars.len(),
            pivots = pivots.len(),
            candidates = candidate_count,
            survivors,
            trendlines = trendlines.len(),
            config = %self.config,
            "trendline detection finished"
        );

        Ok(trendlines)
    }

    /// Detects trendlines and packages them for the charting front end.
    ///
    /// # Errors
    ///
    /// See [`detect`](Self::detect).
    pub fn report(
        &self,
        symbol: impl Into<String>,
        interval: Interval,
        bars: &[impl Ohlcv],
    ) -> Result<TrendlineReport, TrendlineError> {
        let trendlines = self.detect(bars)?.iter().map(Trendline::to_data).collect();

        Ok(TrendlineReport {
            symbol: symbol.into(),
            interval,
            trendlines,
        })
    }
}

impl Display for TrendlineDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TrendlineDetector({})", self.config)
    }
}

/// One-shot detection with options received at the HTTP boundary.
///
/// # Errors
///
/// Returns [`TrendlineError::Configuration`] for out-of-range options and
/// [`TrendlineError::InvalidInput`] for a malformed series.
pub fn detect_trendlines(
    symbol: impl Into<String>,
    interval: Interval,
    bars: &[impl Ohlcv],
    options: TrendlineOptions,
) -> Result<TrendlineReport, TrendlineError> {
    TrendlineDetector::from_options(options)?.report(symbol, interval, bars)
}
