//! Dashboard payload assembly.

use serde::{Deserialize, Serialize};

use crate::period::PeriodBounds;
use crate::profitability::{PortfolioSummary, ScoredHousehold};

use super::activity::ActivityTotals;
use super::goals::{GoalProgress, goal_progress};
use super::types::{AdvisorSnapshot, FirmSnapshot};

/// Number of households listed in the dashboard leaderboard.
pub const TOP_HOUSEHOLDS: usize = 5;

/// Everything `GET /analytics/dashboard` returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Current period.
    pub period: PeriodBounds,
    /// Human-readable period label.
    pub period_label: String,
    /// Firm rollup, when the caller may see it and one exists.
    pub firm: Option<FirmSnapshot>,
    /// Caller's own advisor rollup, if any.
    pub advisor: Option<AdvisorSnapshot>,
    /// Caller's goal progress.
    pub goals: Vec<GoalProgress>,
    /// Profitability across households scored for the period.
    pub profitability: PortfolioSummary,
    /// Caller's activity over the trailing window.
    pub activity: ActivityTotals,
}

impl DashboardSummary {
    /// Assembles the dashboard from already-fetched pieces.
    #[must_use]
    pub fn assemble(
        period: PeriodBounds,
        firm: Option<FirmSnapshot>,
        advisor: Option<AdvisorSnapshot>,
        scored: &[ScoredHousehold],
        activity: ActivityTotals,
    ) -> Self {
        let goals = advisor
            .as_ref()
            .map(|a| goal_progress(&a.goals, &a.actuals()))
            .unwrap_or_default();

        Self {
            period_label: period.label(),
            period,
            firm,
            advisor,
            goals,
            profitability: PortfolioSummary::from_rows(scored, TOP_HOUSEHOLDS),
            activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{ActivityType, AdvisorMetric};
    use crate::period::PeriodType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_assemble_computes_goals_and_label() {
        let period = PeriodType::Quarterly.bounds(NaiveDate::from_ymd_opt(2026, 5, 2).unwrap());
        let advisor = AdvisorSnapshot {
            advisor_id: Uuid::new_v4(),
            advisor_name: "Dana Whitfield".to_string(),
            period_type: PeriodType::Quarterly,
            period_start: period.start,
            households: 42,
            total_aum: dec!(210000000),
            new_aum: dec!(4000000),
            revenue: dec!(450000),
            meetings_held: 61,
            tasks_completed: 130,
            client_retention_rate: dec!(98.5),
            goals: json!({ "revenue": 500000 }),
        };

        let dashboard = DashboardSummary::assemble(
            period,
            None,
            Some(advisor),
            &[],
            ActivityTotals::from_counts([(ActivityType::Meeting, 3)]),
        );

        assert_eq!(dashboard.period_label, "2026-Q2");
        assert_eq!(dashboard.goals.len(), 1);
        assert_eq!(dashboard.goals[0].metric, AdvisorMetric::Revenue);
        assert_eq!(dashboard.goals[0].progress_percent, dec!(90));
        assert_eq!(dashboard.activity.total, 3);
        assert_eq!(dashboard.profitability.household_count, 0);
    }
}
