use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Proportional band width for the touch test, expressed in percent.
///
/// Wraps a finite `f64` in `(0, 100)`. A bar touches a line when its relevant
/// extreme lies within `fraction() * projected` of the projected line value.
///
/// Defaults to `0.75` percent.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Creates a tolerance from a percentage, e.g. `0.75` for 0.75%.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Tolerance`] if `pct` is NaN, infinite, not
    /// positive, or 100 and above.
    pub fn percent(pct: f64) -> Result<Self, ConfigError> {
        if pct.is_finite() && pct > 0.0 && pct < 100.0 {
            Ok(Self(pct))
        } else {
            Err(ConfigError::Tolerance(pct))
        }
    }

    /// Band width as a percentage.
    #[inline]
    #[must_use]
    pub fn pct(self) -> f64 {
        self.0
    }

    /// Band width as a fraction of the projected price.
    #[inline]
    #[must_use]
    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }

    /// Absolute band half-width around `projected`.
    #[inline]
    pub(crate) fn band(self, projected: f64) -> f64 {
        self.fraction() * projected.abs()
    }
}

impl PartialEq for Tolerance {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Tolerance {}

impl Hash for Tolerance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(0.75)
    }
}

/// Which two bars the rendering points of a trendline sit on.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointSpan {
    /// The two anchor pivots the line was fitted through.
    #[default]
    Anchors,
    /// The first and last bar touching the line.
    Touches,
}

impl Display for PointSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Configuration for [`TrendlineDetector`](crate::TrendlineDetector).
///
/// Configs are value types: cheap to copy, compare, and hash.
///
/// # Tuning
///
/// Candidate generation pairs every pivot with every other pivot, so the
/// work grows with the square of the pivot count. A wider
/// [`pivot_window`](Self::pivot_window) yields fewer, more significant pivots
/// and is the knob to turn for long series.
///
/// # Example
///
/// ```
/// use quantedge_trendlines::TrendlineConfig;
///
/// let config = TrendlineConfig::builder()
///     .pivot_window(5)
///     .touch_tolerance_pct(1.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.pivot_window().get(), 5);
/// assert_eq!(config.min_touch_count(), 3);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct TrendlineConfig {
    pivot_window: NonZero<usize>,
    tolerance: Tolerance,
    min_touch_count: usize,
    max_lines_per_direction: Option<NonZero<usize>>,
    slope_similarity: SlopeSimilarity,
    point_span: PointSpan,
}

impl TrendlineConfig {
    pub const DEFAULT_PIVOT_WINDOW: NonZero<usize> = NonZero::new(4).unwrap();
    pub const DEFAULT_TOLERANCE_PCT: f64 = 0.75;
    pub const DEFAULT_MIN_TOUCH_COUNT: usize = 3;
    pub const DEFAULT_MAX_LINES_PER_DIRECTION: usize = 3;
    pub const DEFAULT_SLOPE_SIMILARITY: f64 = 0.05;

    /// Returns a new builder with default values.
    #[must_use]
    pub fn builder() -> TrendlineConfigBuilder {
        TrendlineConfigBuilder::new()
    }

    /// Half-width of the neighborhood a pivot must dominate.
    #[inline]
    #[must_use]
    pub fn pivot_window(&self) -> NonZero<usize> {
        self.pivot_window
    }

    #[inline]
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Lines touched by fewer bars are dropped.
    #[inline]
    #[must_use]
    pub fn min_touch_count(&self) -> usize {
        self.min_touch_count
    }

    /// Output cap per direction, `None` when uncapped.
    #[inline]
    #[must_use]
    pub fn max_lines_per_direction(&self) -> Option<NonZero<usize>> {
        self.max_lines_per_direction
    }

    /// Relative slope difference under which two lines count as duplicates.
    #[inline]
    #[must_use]
    pub fn slope_similarity(&self) -> f64 {
        self.slope_similarity.0
    }

    #[inline]
    #[must_use]
    pub fn point_span(&self) -> PointSpan {
        self.point_span
    }
}

impl Default for TrendlineConfig {
    fn default() -> Self {
        Self {
            pivot_window: Self::DEFAULT_PIVOT_WINDOW,
            tolerance: Tolerance::default(),
            min_touch_count: Self::DEFAULT_MIN_TOUCH_COUNT,
            max_lines_per_direction: NonZero::new(Self::DEFAULT_MAX_LINES_PER_DIRECTION),
            slope_similarity: SlopeSimilarity(Self::DEFAULT_SLOPE_SIMILARITY),
            point_span: PointSpan::Anchors,
        }
    }
}

impl Display for TrendlineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cap = self
            .max_lines_per_direction
            .map_or_else(|| "uncapped".to_owned(), |n| n.to_string());

        write!(
            f,
            "TrendlineConfig({}, {}%, {}, {}, {}, {})",
            self.pivot_window,
            self.tolerance.pct(),
            self.min_touch_count,
            cap,
            self.slope_similarity.0,
            self.point_span
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct SlopeSimilarity(f64);

impl PartialEq for SlopeSimilarity {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for SlopeSimilarity {}

impl Hash for SlopeSimilarity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Builder for [`TrendlineConfig`].
///
/// Every field has a default; values are validated in
/// [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct TrendlineConfigBuilder {
    pivot_window: usize,
    tolerance_pct: f64,
    min_touch_count: usize,
    max_lines_per_direction: Option<usize>,
    slope_similarity: f64,
    point_span: PointSpan,
}

impl TrendlineConfigBuilder {
    fn new() -> Self {
        Self {
            pivot_window: TrendlineConfig::DEFAULT_PIVOT_WINDOW.get(),
            tolerance_pct: TrendlineConfig::DEFAULT_TOLERANCE_PCT,
            min_touch_count: TrendlineConfig::DEFAULT_MIN_TOUCH_COUNT,
            max_lines_per_direction: Some(TrendlineConfig::DEFAULT_MAX_LINES_PER_DIRECTION),
            slope_similarity: TrendlineConfig::DEFAULT_SLOPE_SIMILARITY,
            point_span: PointSpan::Anchors,
        }
    }

    #[inline]
    #[must_use]
    pub fn pivot_window(mut self, window: usize) -> Self {
        self.pivot_window = window;
        self
    }

    /// Sets the touch band in percent of the projected price.
    #[inline]
    #[must_use]
    pub fn touch_tolerance_pct(mut self, pct: f64) -> Self {
        self.tolerance_pct = pct;
        self
    }

    #[inline]
    #[must_use]
    pub fn min_touch_count(mut self, count: usize) -> Self {
        self.min_touch_count = count;
        self
    }

    #[inline]
    #[must_use]
    pub fn max_lines_per_direction(mut self, max: usize) -> Self {
        self.max_lines_per_direction = Some(max);
        self
    }

    /// Removes the per-direction output cap.
    #[inline]
    #[must_use]
    pub fn uncapped(mut self) -> Self {
        self.max_lines_per_direction = None;
        self
    }

    #[inline]
    #[must_use]
    pub fn slope_similarity(mut self, similarity: f64) -> Self {
        self.slope_similarity = similarity;
        self
    }

    #[inline]
    #[must_use]
    pub fn point_span(mut self, span: PointSpan) -> Self {
        self.point_span = span;
        self
    }

    /// Validates the values and builds the config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first out-of-range value.
    pub fn build(self) -> Result<TrendlineConfig, ConfigError> {
        let pivot_window = NonZero::new(self.pivot_window).ok_or(ConfigError::ZeroPivotWindow)?;
        let tolerance = Tolerance::percent(self.tolerance_pct)?;

        if self.min_touch_count < 2 {
            return Err(ConfigError::MinTouchCount(self.min_touch_count));
        }

        let max_lines_per_direction = match self.max_lines_per_direction {
            Some(max) => Some(NonZero::new(max).ok_or(ConfigError::ZeroLineCap)?),
            None => None,
        };

        if !(self.slope_similarity > 0.0 && self.slope_similarity < 1.0) {
            return Err(ConfigError::SlopeSimilarity(self.slope_similarity));
        }

        Ok(TrendlineConfig {
            pivot_window,
            tolerance,
            min_touch_count: self.min_touch_count,
            max_lines_per_direction,
            slope_similarity: SlopeSimilarity(self.slope_similarity),
            point_span: self.point_span,
        })
    }
}

/// Recognized configuration options as received from the HTTP layer.
///
/// Every field is optional; missing fields take the
/// [`TrendlineConfig`] defaults. Convert with `TrendlineConfig::try_from`.
///
/// ```
/// use quantedge_trendlines::{TrendlineConfig, TrendlineOptions};
///
/// let options = TrendlineOptions {
///     pivot_window: Some(6),
///     ..TrendlineOptions::default()
/// };
/// let config = TrendlineConfig::try_from(options).unwrap();
/// assert_eq!(config.pivot_window().get(), 6);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendlineOptions {
    pub pivot_window: Option<usize>,
    pub touch_tolerance_pct: Option<f64>,
    pub min_touch_count: Option<usize>,
    pub max_lines_per_direction: Option<usize>,
    pub slope_similarity: Option<f64>,
    pub point_span: Option<PointSpan>,
}

impl TryFrom<TrendlineOptions> for TrendlineConfig {
    type Error = ConfigError;

    fn try_from(options: TrendlineOptions) -> Result<Self, Self::Error> {
        let mut builder = Self::builder();

        if let Some(window) = options.pivot_window {
            builder = builder.pivot_window(window);
        }
        if let Some(pct) = options.touch_tolerance_pct {
            builder = builder.touch_tolerance_pct(pct);
        }
        if let Some(count) = options.min_touch_count {
            builder = builder.min_touch_count(count);
        }
        if let Some(max) = options.max_lines_per_direction {
            builder = builder.max_lines_per_direction(max);
        }
        if let Some(similarity) = options.slope_similarity {
            builder = builder.slope_similarity(similarity);
        }
        if let Some(span) = options.point_span {
            builder = builder.point_span(span);
        }

        builder.build()
    }
}
