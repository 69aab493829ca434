use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Direction, Line, LineCandidate, Ohlcv, Pivot, PointSpan, Price, ScoredCandidate, Touches,
};

/// One rendering point of a trendline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub time: NaiveDate,
    pub value: Price,
}

/// A trendline in the shape consumed by the charting front end.
///
/// ```json
/// {"direction":"support","touchCount":4,"points":[{"time":"2024-01-06","value":90.0},...]}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendlineData {
    pub direction: Direction,
    pub touch_count: usize,
    pub points: Vec<TrendPoint>,
}

/// A ranked trendline.
///
/// Carries the fitted line, its anchors and touching bars alongside the
/// rendering points. Convert to [`TrendlineData`] for serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct Trendline {
    candidate: LineCandidate,
    touches: Touches,
    points: [TrendPoint; 2],
}

impl Trendline {
    /// Builds the ranked line, rendering it across `span`.
    ///
    /// Anchor and touch indices must lie within `bars`.
    pub(crate) fn new(scored: ScoredCandidate, bars: &[impl Ohlcv], span: PointSpan) -> Self {
        let (candidate, touches) = scored.into_parts();
        let [first, second] = candidate.anchors().map(|p| p.index());

        let (from, to) = match span {
            PointSpan::Anchors => (first, second),
            PointSpan::Touches => (
                touches.first().unwrap_or(first),
                touches.last().unwrap_or(second),
            ),
        };

        let line = candidate.line();
        let point = |index: usize| TrendPoint {
            time: bars[index].time(),
            value: line.value_at(index),
        };

        Self {
            points: [point(from), point(to)],
            candidate,
            touches,
        }
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.candidate.direction()
    }

    /// Number of bars touching the line, anchors included.
    #[inline]
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.touches.count()
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[TrendPoint; 2] {
        &self.points
    }

    #[inline]
    #[must_use]
    pub fn line(&self) -> Line {
        self.candidate.line()
    }

    #[inline]
    #[must_use]
    pub fn anchors(&self) -> [Pivot; 2] {
        self.candidate.anchors()
    }

    #[inline]
    #[must_use]
    pub fn touches(&self) -> &Touches {
        &self.touches
    }

    /// Index of the later anchor, the secondary ranking key.
    #[inline]
    #[must_use]
    pub fn recency(&self) -> usize {
        self.candidate.recency()
    }

    #[must_use]
    pub fn to_data(&self) -> TrendlineData {
        TrendlineData::from(self)
    }
}

impl From<&Trendline> for TrendlineData {
    fn from(trendline: &Trendline) -> Self {
        Self {
            direction: trendline.direction(),
            touch_count: trendline.touch_count(),
            points: trendline.points.to_vec(),
        }
    }
}

impl Display for Trendline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b] = &self.points;
        write!(
            f,
            "{}[{}] {} {} -> {} {}",
            self.direction(),
            self.touch_count(),
            a.time,
            a.value,
            b.time,
            b.value
        )
    }
}
