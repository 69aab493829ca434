// src/test_util.rs

use chrono::{Days, NaiveDate};

use crate::Bar;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Trading day `i` of the test calendar, starting 2024-01-01.
pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i as u64)
}

/// Bar spanning `low..high`, opening at the low and closing at the high.
pub fn bar(i: usize, low: f64, high: f64) -> Bar {
    Bar::new(day(i), low, high, low, high)
}

/// Bar with an explicit close inside `low..high`.
pub fn bar_closing(i: usize, low: f64, high: f64, close: f64) -> Bar {
    Bar::new(day(i), low, high, low, close)
}

/// Bar with all four prices equal.
pub fn flat_bar(i: usize, price: f64) -> Bar {
    Bar::new(day(i), price, price, price, price)
}

/// Consecutive daily bars from paired lows and highs.
pub fn series(lows: &[f64], highs: &[f64]) -> Vec<Bar> {
    assert_eq!(lows.len(), highs.len(), "lows and highs must pair up");
    lows.iter()
        .zip(highs)
        .enumerate()
        .map(|(i, (&low, &high))| bar(i, low, high))
        .collect()
}

/// `n` bars with all prices equal to `price`.
pub fn flat_series(n: usize, price: f64) -> Vec<Bar> {
    (0..n).map(|i| flat_bar(i, price)).collect()
}
