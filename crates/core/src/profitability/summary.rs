//! Portfolio-level aggregation over scored households.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{ProfitabilityMetrics, ProfitabilityTier};

/// A household paired with its scored metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredHousehold {
    /// Household ID.
    pub household_id: Uuid,
    /// Household display name.
    pub household_name: String,
    /// Derived metrics.
    pub metrics: ProfitabilityMetrics,
}

/// Household count per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    /// Platinum households.
    pub platinum: u32,
    /// Gold households.
    pub gold: u32,
    /// Silver households.
    pub silver: u32,
    /// Bronze households.
    pub bronze: u32,
}

impl TierDistribution {
    fn record(&mut self, tier: ProfitabilityTier) {
        let slot = match tier {
            ProfitabilityTier::Platinum => &mut self.platinum,
            ProfitabilityTier::Gold => &mut self.gold,
            ProfitabilityTier::Silver => &mut self.silver,
            ProfitabilityTier::Bronze => &mut self.bronze,
        };
        *slot += 1;
    }
}

/// Aggregate profitability across a set of households.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Number of scored households.
    pub household_count: u32,
    /// Σ revenue.
    pub total_revenue: Decimal,
    /// Σ net profit.
    pub total_net_profit: Decimal,
    /// Portfolio net margin: Σ net profit / Σ revenue × 100.
    pub average_net_margin: Decimal,
    /// Mean composite score.
    pub average_score: Decimal,
    /// Households per tier.
    pub tiers: TierDistribution,
    /// Highest-scoring households, best first.
    pub top_households: Vec<ScoredHousehold>,
}

impl PortfolioSummary {
    /// Summarizes `rows`, keeping the `top_n` best scores.
    #[must_use]
    pub fn from_rows(rows: &[ScoredHousehold], top_n: usize) -> Self {
        let mut tiers = TierDistribution::default();
        let mut total_revenue = Decimal::ZERO;
        let mut total_net_profit = Decimal::ZERO;
        let mut score_sum = Decimal::ZERO;

        for row in rows {
            tiers.record(row.metrics.tier);
            total_revenue = total_revenue.saturating_add(row.metrics.total_revenue);
            total_net_profit = total_net_profit.saturating_add(row.metrics.net_profit);
            score_sum = score_sum.saturating_add(row.metrics.score);
        }

        let household_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let average_score = if rows.is_empty() {
            Decimal::ZERO
        } else {
            (score_sum / Decimal::from(household_count)).round_dp(2)
        };
        let average_net_margin = if total_revenue > Decimal::ZERO {
            total_net_profit
                .checked_div(total_revenue)
                .and_then(|m| m.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Decimal::ZERO, |m| m.round_dp(2))
        } else {
            Decimal::ZERO
        };

        let mut ranked: Vec<&ScoredHousehold> = rows.iter().collect();
        ranked.sort_by(|a, b| {
            b.metrics
                .score
                .cmp(&a.metrics.score)
                .then_with(|| a.household_name.cmp(&b.household_name))
        });
        let top_households = ranked.into_iter().take(top_n).cloned().collect();

        Self {
            household_count,
            total_revenue,
            total_net_profit,
            average_net_margin,
            average_score,
            tiers,
            top_households,
        }
    }
}
