use std::cmp::Reverse;

use tracing::trace;

use crate::{
    Direction, Ohlcv, PivotKind, ScoredCandidate, Tolerance, Trendline, TrendlineConfig,
    line::index_to_f64,
};

type TieBreak = (Direction, usize, usize, PivotKind, PivotKind);

/// Deduplicates, orders and caps scored candidates.
///
/// 1. Candidates below the minimum touch count, or scored against a longer
///    series than `bars`, are ignored.
/// 2. Two candidates of the same direction are duplicates when their slopes
///    are similar and their values at the series midpoint lie within the
///    touch band of each other. The one with more touches survives, then
///    the one whose anchors span more bars.
/// 3. Survivors are ordered by touch count, then by recency of the later
///    anchor, both descending. Remaining ties fall back to span, direction
///    and anchor position so the order is fully deterministic.
/// 4. At most `max_lines_per_direction` lines per direction are kept,
///    counted in that order.
///
/// Slopes are similar when their difference is within `slope_similarity`
/// of the steeper slope, or when the difference accumulated over the whole
/// series stays inside the touch band. The second rule covers near-horizontal
/// lines, whose relative slope difference is unstable.
#[must_use]
pub fn rank(
    scored: Vec<ScoredCandidate>,
    bars: &[impl Ohlcv],
    config: &TrendlineConfig,
) -> Vec<Trendline> {
    let mut scored: Vec<ScoredCandidate> = scored
        .into_iter()
        .filter(|s| {
            s.touch_count() >= config.min_touch_count()
                && s.candidate().recency() < bars.len()
                && s.touches().last().is_none_or(|index| index < bars.len())
        })
        .collect();

    scored.sort_by_key(|s| {
        (
            Reverse(s.touch_count()),
            Reverse(s.candidate().span()),
            Reverse(s.candidate().recency()),
            tie_break(s),
        )
    });

    let similarity = Similarity::new(bars.len(), config);
    let mut survivors: Vec<ScoredCandidate> = Vec::with_capacity(scored.len());

    for candidate in scored {
        if let Some(kept) = survivors
            .iter()
            .find(|kept| similarity.duplicates(kept, &candidate))
        {
            trace!(
                dropped = %candidate.candidate(),
                kept = %kept.candidate(),
                "dropping duplicate trendline"
            );
            continue;
        }
        survivors.push(candidate);
    }

    survivors.sort_by_key(|s| {
        (
            Reverse(s.touch_count()),
            Reverse(s.candidate().recency()),
            Reverse(s.candidate().span()),
            tie_break(s),
        )
    });

    let mut emitted = [0_usize; Direction::ALL.len()];

    survivors
        .into_iter()
        .filter(|s| {
            let count = &mut emitted[s.candidate().direction().ordinal()];
            let keep = config
                .max_lines_per_direction()
                .is_none_or(|max| *count < max.get());
            *count += usize::from(keep);
            keep
        })
        .map(|s| Trendline::new(s, bars, config.point_span()))
        .collect()
}

fn tie_break(scored: &ScoredCandidate) -> TieBreak {
    let candidate = scored.candidate();
    let [a, b] = candidate.anchors();
    (candidate.direction(), a.index(), b.index(), a.kind(), b.kind())
}

struct Similarity {
    midpoint: f64,
    length: f64,
    tolerance: Tolerance,
    slope_similarity: f64,
}

impl Similarity {
    fn new(bars: usize, config: &TrendlineConfig) -> Self {
        let length = index_to_f64(bars.saturating_sub(1));
        Self {
            midpoint: length / 2.0,
            length,
            tolerance: config.tolerance(),
            slope_similarity: config.slope_similarity(),
        }
    }

    fn duplicates(&self, a: &ScoredCandidate, b: &ScoredCandidate) -> bool {
        let (a, b) = (a.candidate(), b.candidate());
        if a.direction() != b.direction() {
            return false;
        }

        let (line_a, line_b) = (a.line(), b.line());
        let (mid_a, mid_b) = (
            line_a.value_at_x(self.midpoint),
            line_b.value_at_x(self.midpoint),
        );
        let band = self.tolerance.band(mid_a.abs().max(mid_b.abs()));

        let slope_diff = (line_a.slope() - line_b.slope()).abs();
        let steeper = line_a.slope().abs().max(line_b.slope().abs());
        let similar_slope =
            slope_diff <= self.slope_similarity * steeper || slope_diff * self.length <= band;

        similar_slope && (mid_a - mid_b).abs() < band
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        LineCandidate, Pivot, PointSpan, evaluate,
        test_util::{flat_series, series},
    };

    fn config() -> TrendlineConfig {
        TrendlineConfig::builder()
            .min_touch_count(2)
            .uncapped()
            .build()
            .unwrap()
    }

    fn scored(
        direction: Direction,
        a: (usize, f64),
        b: (usize, f64),
        bars: &[crate::Bar],
    ) -> ScoredCandidate {
        let kind = match direction {
            Direction::Resistance => PivotKind::High,
            _ => PivotKind::Low,
        };
        let candidate = LineCandidate::new(
            Pivot::new(a.0, kind, a.1),
            Pivot::new(b.0, kind, b.1),
            direction,
        )
        .unwrap();
        let touches = evaluate(&candidate, bars, config().tolerance());
        ScoredCandidate::new(candidate, touches)
    }

    mod dedup {
        use super::*;

        #[test]
        fn keeps_one_of_identical_lines() {
            let bars = flat_series(30, 100.0);
            let lines = vec![
                scored(Direction::Support, (4, 100.0), (9, 100.0), &bars),
                scored(Direction::Support, (4, 100.0), (24, 100.0), &bars),
                scored(Direction::Support, (9, 100.0), (14, 100.0), &bars),
            ];

            let ranked = rank(lines, &bars, &config());
            assert_eq!(ranked.len(), 1);
            // equal touch counts, longest span wins
            assert_eq!(ranked[0].anchors()[0].index(), 4);
            assert_eq!(ranked[0].anchors()[1].index(), 24);
        }

        #[test]
        fn keeps_higher_touch_count() {
            let mut lows = vec![110.0; 30];
            for i in [3, 10, 17, 24] {
                lows[i] = 100.0;
            }
            lows[27] = 100.4;
            let highs: Vec<f64> = lows.iter().map(|l| l + 5.0).collect();
            let bars = series(&lows, &highs);

            // Both lines sit within the band of each other; the first also
            // catches bar 27.
            let strong = scored(Direction::Support, (3, 100.0), (10, 100.0), &bars);
            let weak = scored(Direction::Support, (3, 99.5), (24, 99.5), &bars);
            assert!(strong.touch_count() > weak.touch_count());

            let ranked = rank(vec![weak, strong.clone()], &bars, &config());
            assert_eq!(ranked.len(), 1);
            assert_eq!(ranked[0].anchors(), strong.candidate().anchors());
        }

        #[test]
        fn different_directions_never_collapse() {
            let bars = flat_series(30, 100.0);
            let lines = vec![
                scored(Direction::Support, (4, 100.0), (9, 100.0), &bars),
                scored(Direction::Resistance, (4, 100.0), (9, 100.0), &bars),
            ];

            assert_eq!(rank(lines, &bars, &config()).len(), 2);
        }

        #[test]
        fn distant_parallel_lines_both_survive() {
            let bars = flat_series(30, 100.0);
            let lines = vec![
                scored(Direction::Support, (4, 100.0), (9, 100.0), &bars),
                scored(Direction::Support, (4, 90.0), (9, 90.0), &bars),
            ];

            assert_eq!(rank(lines, &bars, &config()).len(), 2);
        }

        #[test]
        fn diverging_slopes_both_survive() {
            let bars = flat_series(30, 100.0);
            // Same value at the midpoint, opposite slopes.
            let lines = vec![
                scored(Direction::Support, (10, 95.0), (19, 104.0), &bars),
                scored(Direction::Support, (10, 104.0), (19, 95.0), &bars),
            ];

            assert_eq!(rank(lines, &bars, &config()).len(), 2);
        }
    }

    mod ordering {
        use super::*;

        fn staircase() -> Vec<crate::Bar> {
            let mut lows = vec![120.0; 40];
            // level 100 touched 4 times, level 90 touched 3 times, level 80
            // touched 3 times but more recently.
            for i in [2, 8, 14, 20] {
                lows[i] = 100.0;
            }
            for i in [4, 10, 16] {
                lows[i] = 90.0;
            }
            for i in [25, 31, 37] {
                lows[i] = 80.0;
            }
            let highs: Vec<f64> = lows.iter().map(|l| l + 5.0).collect();
            series(&lows, &highs)
        }

        #[test]
        fn touch_count_then_recency() {
            let bars = staircase();
            let lines = vec![
                scored(Direction::Support, (4, 90.0), (16, 90.0), &bars),
                scored(Direction::Support, (25, 80.0), (37, 80.0), &bars),
                scored(Direction::Support, (2, 100.0), (20, 100.0), &bars),
            ];

            let ranked = rank(lines, &bars, &config());
            let levels: Vec<f64> = ranked.iter().map(|t| t.points()[0].value).collect();
            assert_eq!(levels, vec![100.0, 80.0, 90.0]);
            assert_eq!(
                ranked.iter().map(Trendline::touch_count).collect::<Vec<_>>(),
                vec![4, 3, 3]
            );
        }

        #[test]
        fn cap_applies_after_ordering() {
            let bars = staircase();
            let lines = vec![
                scored(Direction::Support, (4, 90.0), (16, 90.0), &bars),
                scored(Direction::Support, (25, 80.0), (37, 80.0), &bars),
                scored(Direction::Support, (2, 100.0), (20, 100.0), &bars),
            ];
            let capped = TrendlineConfig::builder()
                .min_touch_count(2)
                .max_lines_per_direction(2)
                .build()
                .unwrap();

            let ranked = rank(lines, &bars, &capped);
            let levels: Vec<f64> = ranked.iter().map(|t| t.points()[0].value).collect();
            assert_eq!(levels, vec![100.0, 80.0]);
        }

        #[test]
        fn cap_counts_each_direction_separately() {
            let bars = flat_series(30, 100.0);
            let lines = vec![
                scored(Direction::Support, (4, 100.0), (9, 100.0), &bars),
                scored(Direction::Support, (4, 90.0), (9, 90.0), &bars),
                scored(Direction::Resistance, (4, 100.0), (9, 100.0), &bars),
            ];
            let capped = TrendlineConfig::builder()
                .min_touch_count(2)
                .max_lines_per_direction(1)
                .build()
                .unwrap();

            let ranked = rank(lines, &bars, &capped);
            assert_eq!(ranked.len(), 2);
            assert!(ranked.iter().any(|t| t.direction() == Direction::Support));
            assert!(ranked.iter().any(|t| t.direction() == Direction::Resistance));
        }

        #[test]
        fn input_order_does_not_matter() {
            let bars = staircase();
            let lines = vec![
                scored(Direction::Support, (4, 90.0), (16, 90.0), &bars),
                scored(Direction::Support, (25, 80.0), (37, 80.0), &bars),
                scored(Direction::Support, (2, 100.0), (20, 100.0), &bars),
            ];
            let mut reversed = lines.clone();
            reversed.reverse();

            assert_eq!(
                rank(lines, &bars, &config()),
                rank(reversed, &bars, &config())
            );
        }
    }

    #[test]
    fn drops_lines_below_min_touch_count() {
        let bars = flat_series(30, 100.0);
        let lines = vec![scored(Direction::Support, (4, 80.0), (9, 85.0), &bars)];
        let strict = TrendlineConfig::builder().min_touch_count(3).build().unwrap();

        assert!(rank(lines, &bars, &strict).is_empty());
    }

    #[test]
    fn ignores_candidates_scored_on_a_longer_series() {
        let longer = flat_series(30, 100.0);
        let lines = vec![scored(Direction::Support, (4, 100.0), (9, 100.0), &longer)];
        let touches_span = TrendlineConfig::builder()
            .min_touch_count(2)
            .point_span(PointSpan::Touches)
            .build()
            .unwrap();

        assert!(rank(lines, &longer[..20], &touches_span).is_empty());
    }

    #[test]
    fn renders_with_configured_span() {
        let bars = flat_series(30, 100.0);
        let lines = vec![scored(Direction::Support, (4, 100.0), (9, 100.0), &bars)];
        let touches_span = TrendlineConfig::builder()
            .min_touch_count(2)
            .point_span(PointSpan::Touches)
            .build()
            .unwrap();

        let ranked = rank(lines, &bars, &touches_span);
        assert_eq!(ranked[0].points()[0].time, bars[0].time);
        assert_eq!(ranked[0].points()[1].time, bars[29].time);
    }
}
