use crate::{Direction, LineCandidate, Ohlcv, Price, Tolerance, TrendlineConfig};

/// Bars touching a line, by ascending index.
///
/// Always includes the line's two anchors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Touches {
    indices: Vec<usize>,
}

impl Touches {
    /// Number of distinct touching bars.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Earliest touching bar.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// Latest touching bar.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }
}

/// Counts the bars touching a candidate line.
///
/// The line is projected across the whole series, not only between its
/// anchors. A bar touches when its relevant extreme lies within the
/// tolerance band of the projected value:
///
/// ```text
/// |extreme − projected| ≤ tolerance × projected
/// ```
///
/// Support lines test the bar's low, resistance lines its high. Cross lines
/// test whichever of the two lies nearer the projection, so a cross line's
/// anchors touch it whatever kind of pivot they are. Where the projection is
/// zero or negative nothing touches. The two anchors always count.
///
/// Every bar of the series is tested, edge bars included. A flat series
/// therefore touches its horizontal lines on every bar, even though the
/// bars within the pivot window of either end can never be pivots.
///
/// Widening the tolerance never removes a touch.
#[must_use]
pub fn evaluate(candidate: &LineCandidate, bars: &[impl Ohlcv], tolerance: Tolerance) -> Touches {
    let line = candidate.line();
    let direction = candidate.direction();
    let [first, second] = candidate.anchors().map(|p| p.index());

    let indices = bars
        .iter()
        .enumerate()
        .filter(|&(index, bar)| {
            index == first
                || index == second
                || touches(bar, line.value_at(index), direction, tolerance)
        })
        .map(|(index, _)| index)
        .collect();

    Touches { indices }
}

#[inline]
pub(crate) fn touches(
    bar: &impl Ohlcv,
    projected: Price,
    direction: Direction,
    tolerance: Tolerance,
) -> bool {
    if projected.is_nan() || projected <= 0.0 {
        return false;
    }

    let distance = match direction {
        Direction::Support => (bar.low() - projected).abs(),
        Direction::Resistance => (bar.high() - projected).abs(),
        Direction::Cross => (bar.low() - projected)
            .abs()
            .min((bar.high() - projected).abs()),
    };

    distance <= tolerance.band(projected)
}

/// A candidate together with its touches.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
    candidate: LineCandidate,
    touches: Touches,
}

impl ScoredCandidate {
    #[must_use]
    pub fn new(candidate: LineCandidate, touches: Touches) -> Self {
        Self { candidate, touches }
    }

    #[inline]
    #[must_use]
    pub fn candidate(&self) -> &LineCandidate {
        &self.candidate
    }

    #[inline]
    #[must_use]
    pub fn touches(&self) -> &Touches {
        &self.touches
    }

    #[inline]
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.touches.count()
    }

    pub(crate) fn into_parts(self) -> (LineCandidate, Touches) {
        (self.candidate, self.touches)
    }
}

/// Evaluates every candidate and keeps those touched by at least
/// `config.min_touch_count()` bars.
///
/// This is the main significance filter and runs before deduplication.
#[must_use]
pub fn score_candidates(
    candidates: Vec<LineCandidate>,
    bars: &[impl Ohlcv],
    config: &TrendlineConfig,
) -> Vec<ScoredCandidate> {
    let tolerance = config.tolerance();
    let min_touch_count = config.min_touch_count();

    candidates
        .into_iter()
        .filter_map(|candidate| {
            let touches = evaluate(&candidate, bars, tolerance);
            (touches.count() >= min_touch_count).then(|| ScoredCandidate::new(candidate, touches))
        })
        .collect()
}
