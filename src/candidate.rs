use std::fmt::Display;

use chrono::NaiveDate;

use crate::{Direction, Line, Ohlcv, Pivot, PivotKind, TrendlineData};

/// A line fitted through two pivots, before touch evaluation.
///
/// Anchors are stored in index order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCandidate {
    anchors: [Pivot; 2],
    line: Line,
    direction: Direction,
}

impl LineCandidate {
    /// Fits a line through two pivots and tags it with `direction`.
    ///
    /// Returns `None` when both pivots sit on the same bar.
    #[must_use]
    pub fn new(a: Pivot, b: Pivot, direction: Direction) -> Option<Self> {
        let (first, second) = if a.index() <= b.index() { (a, b) } else { (b, a) };
        let line = Line::through(
            (first.index(), first.price()),
            (second.index(), second.price()),
        )?;

        Some(Self {
            anchors: [first, second],
            line,
            direction,
        })
    }

    /// Rebuilds a candidate from the rendering points of an emitted
    /// trendline, locating the point dates in `bars`.
    ///
    /// Returns `None` when the data does not carry exactly two points, a
    /// point date is missing from the series, or both points share a date.
    #[must_use]
    pub fn from_trendline(data: &TrendlineData, bars: &[impl Ohlcv]) -> Option<Self> {
        let [a, b] = data.points.as_slice() else {
            return None;
        };

        let anchor = |time: NaiveDate, value: f64| {
            let index = bars.binary_search_by_key(&time, |bar| bar.time()).ok()?;
            let kind = match data.direction {
                Direction::Support => PivotKind::Low,
                Direction::Resistance => PivotKind::High,
                Direction::Cross => nearest_extreme(&bars[index], value),
            };
            Some(Pivot::new(index, kind, value))
        };

        Self::new(anchor(a.time, a.value)?, anchor(b.time, b.value)?, data.direction)
    }

    /// The two pivots the line runs through, earliest first.
    #[inline]
    #[must_use]
    pub fn anchors(&self) -> [Pivot; 2] {
        self.anchors
    }

    #[inline]
    #[must_use]
    pub fn line(&self) -> Line {
        self.line
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Bars between the two anchors.
    #[inline]
    #[must_use]
    pub fn span(&self) -> usize {
        self.anchors[1].index() - self.anchors[0].index()
    }

    /// Index of the later anchor.
    #[inline]
    #[must_use]
    pub fn recency(&self) -> usize {
        self.anchors[1].index()
    }
}

impl Display for LineCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}, {})",
            self.direction, self.anchors[0], self.anchors[1]
        )
    }
}

/// Pairs pivots into candidate lines.
///
/// - two swing lows form a support candidate;
/// - two swing highs form a resistance candidate;
/// - a swing high paired with a swing low forms a cross candidate when price
///   sits wholly on one side of the line and later wholly on the other.
///   Otherwise the pair takes the support or resistance kind of its later
///   pivot.
///
/// Every pair is considered, so the output grows with the square of the
/// pivot count. Widen the pivot window to keep it small. Pairs on the same
/// bar and pivots outside `bars` are skipped.
#[must_use]
pub fn generate_candidates(pivots: &[Pivot], bars: &[impl Ohlcv]) -> Vec<LineCandidate> {
    let pivots: Vec<Pivot> = pivots
        .iter()
        .copied()
        .filter(|p| p.index() < bars.len())
        .collect();
    let mut candidates = Vec::with_capacity(pivots.len() * pivots.len().saturating_sub(1) / 2);

    for (i, &a) in pivots.iter().enumerate() {
        for &b in &pivots[i + 1..] {
            if let Some(candidate) = pair(a, b, bars) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

fn pair(a: Pivot, b: Pivot, bars: &[impl Ohlcv]) -> Option<LineCandidate> {
    let mut candidate = LineCandidate::new(a, b, Direction::Support)?;
    let [first, second] = candidate.anchors;

    candidate.direction = match (first.kind(), second.kind()) {
        (PivotKind::Low, PivotKind::Low) => Direction::Support,
        (PivotKind::High, PivotKind::High) => Direction::Resistance,
        _ if crosses(&candidate.line, bars) => Direction::Cross,
        (_, PivotKind::Low) => Direction::Support,
        (_, PivotKind::High) => Direction::Resistance,
    };

    Some(candidate)
}

/// `true` when some bar lies entirely on one side of the line and a later
/// bar entirely on the other. Bars the line passes through are ignored.
pub(crate) fn crosses(line: &Line, bars: &[impl Ohlcv]) -> bool {
    let mut price_above: Option<bool> = None;

    for (index, bar) in bars.iter().enumerate() {
        let projected = line.value_at(index);

        let side = if bar.low() > projected {
            Some(true)
        } else if bar.high() < projected {
            Some(false)
        } else {
            None
        };

        match (price_above, side) {
            (Some(previous), Some(current)) if previous != current => return true,
            (_, Some(current)) => price_above = Some(current),
            _ => {}
        }
    }

    false
}

fn nearest_extreme(bar: &impl Ohlcv, value: f64) -> PivotKind {
    if (bar.high() - value).abs() < (bar.low() - value).abs() {
        PivotKind::High
    } else {
        PivotKind::Low
    }
}
