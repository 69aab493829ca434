use rayon::prelude::*;
use tracing::debug;

use crate::{Interval, Ohlcv, TrendlineDetector, TrendlineError, TrendlineReport};

/// One symbol's series queued for batch detection.
#[derive(Clone, Copy, Debug)]
pub struct SeriesRequest<'a, B> {
    pub symbol: &'a str,
    pub interval: Interval,
    pub bars: &'a [B],
}

impl<'a, B> SeriesRequest<'a, B> {
    #[must_use]
    pub fn new(symbol: &'a str, interval: Interval, bars: &'a [B]) -> Self {
        Self {
            symbol,
            interval,
            bars,
        }
    }
}

impl TrendlineDetector {
    /// Detects trendlines for many series in parallel.
    ///
    /// Results keep the order of `requests`. A malformed series fails on its
    /// own without affecting the others.
    #[must_use]
    pub fn report_all<B: Ohlcv + Sync>(
        &self,
        requests: &[SeriesRequest<'_, B>],
    ) -> Vec<Result<TrendlineReport, TrendlineError>> {
        let reports: Vec<_> = requests
            .par_iter()
            .map(|request| self.report(request.symbol, request.interval, request.bars))
            .collect();

        debug!(
            series = requests.len(),
            failed = reports.iter().filter(|r| r.is_err()).count(),
            "batch trendline detection finished"
        );

        reports
    }
}
