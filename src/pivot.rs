use std::{fmt::Display, num::NonZero};

use crate::{Ohlcv, Price};

/// Swing kind of a [`Pivot`].
///
/// Ordered `High` before `Low`, the order pivots sharing an index are
/// emitted in.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum PivotKind {
    /// Swing high: the bar's high dominates its neighborhood.
    High,
    /// Swing low: the bar's low dominates its neighborhood.
    Low,
}

impl PivotKind {
    /// The bar price this kind of pivot is measured on.
    #[inline]
    pub(crate) fn extreme(self, bar: &impl Ohlcv) -> Price {
        match self {
            Self::High => bar.high(),
            Self::Low => bar.low(),
        }
    }

    /// `true` when `price` is at least as extreme as `other`.
    #[inline]
    fn dominates(self, price: Price, other: Price) -> bool {
        match self {
            Self::High => price >= other,
            Self::Low => price <= other,
        }
    }
}

impl Display for PivotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A local price extremum used as a line anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pivot {
    index: usize,
    kind: PivotKind,
    price: Price,
}

impl Pivot {
    #[must_use]
    pub fn new(index: usize, kind: PivotKind, price: Price) -> Self {
        Self { index, kind, price }
    }

    /// Position of the pivot bar in the input series.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> PivotKind {
        self.kind
    }

    /// The bar's high for swing highs, its low for swing lows.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }
}

impl Display for Pivot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}({})", self.kind, self.index, self.price)
    }
}

/// Finds swing highs and swing lows.
///
/// Bar `i` is a swing high when its high is the maximum of the bars in
/// `[i - window, i + window]`, and a swing low when its low is the minimum.
/// Bars closer than `window` to either end of the series lack a full
/// neighborhood and are never pivots.
///
/// Equal extremes resolve to the earliest bar: a bar repeating the price of
/// a same-kind pivot emitted at most `window` bars earlier is skipped. A
/// plateau therefore produces one pivot every `window + 1` bars instead of
/// one per bar.
///
/// Output is ordered by index, highs before lows on the same bar. A series
/// shorter than `2 * window + 1` bars yields no pivots.
///
/// # Example
///
/// ```
/// use chrono::{Days, NaiveDate};
/// use quantedge_trendlines::{Bar, PivotKind, extract_pivots};
/// use std::num::NonZero;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let lows = [5.0, 4.0, 3.0, 1.0, 3.0, 4.0, 5.0];
/// let bars: Vec<Bar> = lows
///     .iter()
///     .enumerate()
///     .map(|(i, &low)| Bar::new(start + Days::new(i as u64), low, low + 1.0, low, low))
///     .collect();
///
/// let pivots = extract_pivots(&bars, NonZero::new(2).unwrap());
/// assert_eq!(pivots.len(), 1);
/// assert_eq!(pivots[0].index(), 3);
/// assert_eq!(pivots[0].kind(), PivotKind::Low);
/// ```
#[must_use]
pub fn extract_pivots(bars: &[impl Ohlcv], window: NonZero<usize>) -> Vec<Pivot> {
    let window = window.get();

    if bars.len() < 2 * window + 1 {
        return Vec::new();
    }

    let mut pivots = scan(bars, window, PivotKind::High);
    pivots.extend(scan(bars, window, PivotKind::Low));
    pivots.sort_by_key(|p| (p.index, p.kind));

    pivots
}

#[allow(clippy::float_cmp)]
fn scan(bars: &[impl Ohlcv], window: usize, kind: PivotKind) -> Vec<Pivot> {
    let mut pivots: Vec<Pivot> = Vec::new();

    for index in window..bars.len() - window {
        let price = kind.extreme(&bars[index]);
        let neighborhood = &bars[index - window..=index + window];

        if !neighborhood
            .iter()
            .all(|bar| kind.dominates(price, kind.extreme(bar)))
        {
            continue;
        }

        let repeats_last = pivots
            .last()
            .is_some_and(|last| index - last.index <= window && last.price == price);

        if !repeats_last {
            pivots.push(Pivot::new(index, kind, price));
        }
    }

    pivots
}
