use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// OHLCV bar data used as input to trendline detection.
///
/// Implement this on your own kline/candle type to avoid copying the series
/// before detection. The engine accepts `&[impl Ohlcv]` and reads the high,
/// low and close of every bar.
///
/// # Series order
///
/// Bars must be sorted ascending by [`time`](Ohlcv::time) with no duplicate
/// dates. Detection validates this and fails with
/// [`InputError`](crate::InputError) instead of repairing the series.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use quantedge_trendlines::{Ohlcv, Price};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
///     day: NaiveDate,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn time(&self) -> NaiveDate { self.day }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Calendar date the bar belongs to.
    ///
    /// For weekly and monthly intervals this is the first trading day of the
    /// period, as delivered by the data provider.
    fn time(&self) -> NaiveDate;

    /// Trade volume during the bar. Defaults to `0`.
    ///
    /// Trendline detection ignores volume; the accessor exists so provider
    /// records can be passed through unchanged.
    fn volume(&self) -> u64 {
        0
    }
}

/// A single OHLCV record as delivered by the market-data provider.
///
/// Deserializes from `{time, open, high, low, close, volume}` with `time`
/// formatted as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    #[serde(default)]
    pub volume: u64,
}

impl Bar {
    #[must_use]
    pub fn new(time: NaiveDate, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: 0,
        }
    }

    /// Sets the traded volume.
    #[must_use]
    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = volume;
        self
    }
}

impl Ohlcv for Bar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn time(&self) -> NaiveDate {
        self.time
    }

    #[inline]
    fn volume(&self) -> u64 {
        self.volume
    }
}
