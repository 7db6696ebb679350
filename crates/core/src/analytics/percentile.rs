//! Percentile ranking of peers on a single value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rank of one member within its peer group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileRank<K> {
    /// Member key (usually an advisor ID).
    pub key: K,
    /// Ranked value.
    pub value: Decimal,
    /// 1-based competition rank; ties share the best rank.
    pub rank: u32,
    /// Share of the group whose value is at or below this one, × 100.
    pub percentile: Decimal,
}

/// Ranks `values` best first.
///
/// Ties get the same rank and percentile. The top value is always the
/// 100th percentile.
#[must_use]
pub fn percentile_ranks<K: Clone>(values: &[(K, Decimal)]) -> Vec<PercentileRank<K>> {
    if values.is_empty() {
        return Vec::new();
    }

    let total = Decimal::from(values.len());
    let mut sorted: Vec<&(K, Decimal)> = values.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ranks = Vec::with_capacity(sorted.len());
    let mut rank = 1u32;
    for (index, (key, value)) in sorted.iter().map(|entry| (&entry.0, entry.1)).enumerate() {
        if index > 0 && value < sorted[index - 1].1 {
            rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }
        let at_or_below = sorted.iter().filter(|other| other.1 <= value).count();
        ranks.push(PercentileRank {
            key: key.clone(),
            value,
            rank,
            percentile: (Decimal::from(at_or_below) / total * Decimal::ONE_HUNDRED).round_dp(2),
        });
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ranks_best_first() {
        let ranks = percentile_ranks(&[("a", dec!(100)), ("b", dec!(300)), ("c", dec!(200))]);

        let keys: Vec<&str> = ranks.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
        assert_eq!(ranks[0].percentile, dec!(100));
        assert_eq!(ranks[1].percentile, dec!(66.67));
        assert_eq!(ranks[2].percentile, dec!(33.33));
        assert_eq!(ranks[2].rank, 3);
    }

    #[test]
    fn test_ties_share_rank_and_percentile() {
        let ranks = percentile_ranks(&[
            ("a", dec!(50)),
            ("b", dec!(80)),
            ("c", dec!(80)),
            ("d", dec!(10)),
        ]);

        assert_eq!(ranks[0].rank, 1);
        assert_eq!(ranks[1].rank, 1);
        assert_eq!(ranks[0].percentile, dec!(100));
        assert_eq!(ranks[1].percentile, dec!(100));
        assert_eq!(ranks[2].rank, 3);
        assert_eq!(ranks[2].percentile, dec!(50));
        assert_eq!(ranks[3].rank, 4);
        assert_eq!(ranks[3].percentile, dec!(25));
    }

    #[test]
    fn test_single_member_is_top() {
        let ranks = percentile_ranks(&[(1, dec!(0))]);
        assert_eq!(ranks[0].rank, 1);
        assert_eq!(ranks[0].percentile, dec!(100));
    }

    #[test]
    fn test_empty_group() {
        assert!(percentile_ranks::<u8>(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_percentiles_follow_values(raw in prop::collection::vec(0i64..1_000, 1..40)) {
            let values: Vec<(usize, Decimal)> =
                raw.iter().enumerate().map(|(i, v)| (i, Decimal::from(*v))).collect();
            let ranks = percentile_ranks(&values);

            prop_assert_eq!(ranks.len(), values.len());
            prop_assert_eq!(ranks[0].percentile, Decimal::ONE_HUNDRED);
            for pair in ranks.windows(2) {
                prop_assert!(pair[0].value >= pair[1].value);
                prop_assert!(pair[0].percentile >= pair[1].percentile);
                prop_assert!(pair[0].rank <= pair[1].rank);
            }
        }
    }
}
