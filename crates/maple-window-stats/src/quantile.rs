//! Nearest-rank quantile summaries.
//!
//! Reservoirs already under-sample the population, so quantiles pick the
//! element at a rank index instead of interpolating between neighbours.

use serde::{Deserialize, Serialize};

use crate::invariants::{
    MEDIAN_PERCENT, PERCENTILE_95_PERCENT, QUARTILE_1_PERCENT, QUARTILE_3_PERCENT,
};

/// Rank statistics for one window.
///
/// `count` is the estimated true number of events in the window, not the
/// number of retained samples the ranks were computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantileSummary {
    pub quartile_1: i64,
    pub median: i64,
    pub quartile_3: i64,
    pub percentile_95: i64,
    pub largest_value: i64,
    pub count: u64,
}

impl QuantileSummary {
    /// The result for a window with no eligible samples.
    pub const ZERO: QuantileSummary = QuantileSummary {
        quartile_1: 0,
        median: 0,
        quartile_3: 0,
        percentile_95: 0,
        largest_value: 0,
        count: 0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Index of the `percent` rank in a sorted sequence of `n` elements:
/// `floor(percent / 100 * n)`, clamped to `[0, n - 1]`.
///
/// `n` must be non-zero.
pub fn rank_index(n: usize, percent: usize) -> usize {
    (n * percent / 100).min(n.saturating_sub(1))
}

/// Summarize `values` by nearest rank, reporting `count` as the window's
/// estimated event count.
pub fn rank_summary(mut values: Vec<i64>, count: u64) -> QuantileSummary {
    if values.is_empty() {
        return QuantileSummary::ZERO;
    }
    values.sort_unstable();
    let n = values.len();

    QuantileSummary {
        quartile_1: values[rank_index(n, QUARTILE_1_PERCENT)],
        median: values[rank_index(n, MEDIAN_PERCENT)],
        quartile_3: values[rank_index(n, QUARTILE_3_PERCENT)],
        percentile_95: values[rank_index(n, PERCENTILE_95_PERCENT)],
        largest_value: values[n - 1],
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_yield_zero() {
        let s = rank_summary(Vec::new(), 1234);
        assert_eq!(s, QuantileSummary::ZERO);
        assert!(s.is_zero());
    }

    #[test]
    fn default_is_zero() {
        assert!(QuantileSummary::default().is_zero());
    }

    #[test]
    fn rank_index_boundaries_for_100() {
        assert_eq!(rank_index(100, 25), 25);
        assert_eq!(rank_index(100, 50), 50);
        assert_eq!(rank_index(100, 75), 75);
        assert_eq!(rank_index(100, 95), 95);
        assert_eq!(rank_index(100, 100), 99);
    }

    #[test]
    fn rank_index_boundaries_for_1000() {
        assert_eq!(rank_index(1000, 25), 250);
        assert_eq!(rank_index(1000, 95), 950);
    }

    #[test]
    fn rank_index_small_sequences() {
        assert_eq!(rank_index(1, 95), 0);
        assert_eq!(rank_index(2, 50), 1);
        assert_eq!(rank_index(3, 25), 0);
        assert_eq!(rank_index(3, 95), 2);
    }

    #[test]
    fn ascending_fixture_of_100() {
        let s = rank_summary((0..100).collect(), 2000);
        assert_eq!(s.quartile_1, 25);
        assert_eq!(s.median, 50);
        assert_eq!(s.quartile_3, 75);
        assert_eq!(s.percentile_95, 95);
        assert_eq!(s.largest_value, 99);
        assert_eq!(s.count, 2000);
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let s = rank_summary(vec![9, 3, 7, 1, 5, 0, 8, 2, 6, 4], 10);
        assert_eq!(s.quartile_1, 2);
        assert_eq!(s.median, 5);
        assert_eq!(s.quartile_3, 7);
        assert_eq!(s.percentile_95, 9);
        assert_eq!(s.largest_value, 9);
    }

    #[test]
    fn single_value_fills_every_rank() {
        let s = rank_summary(vec![42], 7);
        assert_eq!(s.quartile_1, 42);
        assert_eq!(s.percentile_95, 42);
        assert_eq!(s.largest_value, 42);
        assert_eq!(s.count, 7);
    }

    #[test]
    fn negative_values_rank_correctly() {
        let s = rank_summary(vec![-5, -1, -3, -2, -4], 5);
        assert_eq!(s.quartile_1, -4);
        assert_eq!(s.median, -3);
        assert_eq!(s.largest_value, -1);
    }

    #[test]
    fn summary_serialization_uses_field_names() {
        let s = rank_summary((0..4).collect(), 4);
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["quartile_1"], 1);
        assert_eq!(json["percentile_95"], 3);
        assert_eq!(json["count"], 4);
    }
}
