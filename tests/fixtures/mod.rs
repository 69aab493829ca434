#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use quantedge_trendlines::{Bar, Direction, Trendline};
use serde::de::DeserializeOwned;

const DAILY_PATH: &str = "tests/fixtures/data/acme-1d.csv";

/// Load one year of daily bars.
pub fn load_daily_bars() -> Vec<Bar> {
    load_records(DAILY_PATH, "invalid OHLCV record")
}

/// Calendar day `i` counted from 2024-01-01.
pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i as u64)
}

/// Consecutive daily bars from paired lows and highs, each opening at the
/// low and closing at the high.
pub fn bars_from(lows: &[f64], highs: &[f64]) -> Vec<Bar> {
    assert_eq!(lows.len(), highs.len(), "lows and highs must pair up");
    lows.iter()
        .zip(highs)
        .enumerate()
        .map(|(i, (&low, &high))| Bar::new(day(i), low, high, low, high))
        .collect()
}

/// `n` bars with every price equal to `price`.
pub fn flat_bars(n: usize, price: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| Bar::new(day(i), price, price, price, price))
        .collect()
}

pub fn of_direction(trendlines: &[Trendline], direction: Direction) -> Vec<&Trendline> {
    trendlines
        .iter()
        .filter(|t| t.direction() == direction)
        .collect()
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
