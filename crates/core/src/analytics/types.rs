//! Analytics data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::period::PeriodType;

use super::error::AnalyticsError;

/// Advisor metric that can be ranked or targeted by a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorMetric {
    /// Fee revenue attributed to the advisor.
    Revenue,
    /// AUM across the advisor's households.
    TotalAum,
    /// Net new assets in the period.
    NewAum,
    /// Number of households served.
    Households,
    /// Client meetings held.
    MeetingsHeld,
    /// Tasks completed.
    TasksCompleted,
}

impl AdvisorMetric {
    /// All metrics in display order.
    pub const ALL: [Self; 6] = [
        Self::Revenue,
        Self::TotalAum,
        Self::NewAum,
        Self::Households,
        Self::MeetingsHeld,
        Self::TasksCompleted,
    ];

    /// Returns the key used in goal objects and query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::TotalAum => "total_aum",
            Self::NewAum => "new_aum",
            Self::Households => "households",
            Self::MeetingsHeld => "meetings_held",
            Self::TasksCompleted => "tasks_completed",
        }
    }

    /// Parses a metric key. camelCase keys from older clients are accepted.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::UnknownMetric` for anything else.
    pub fn parse(s: &str) -> Result<Self, AnalyticsError> {
        match s {
            "revenue" => Ok(Self::Revenue),
            "total_aum" | "totalAum" | "aum" => Ok(Self::TotalAum),
            "new_aum" | "newAum" => Ok(Self::NewAum),
            "households" => Ok(Self::Households),
            "meetings_held" | "meetingsHeld" | "meetings" => Ok(Self::MeetingsHeld),
            "tasks_completed" | "tasksCompleted" | "tasks" => Ok(Self::TasksCompleted),
            other => Err(AnalyticsError::UnknownMetric(other.to_string())),
        }
    }
}

/// One advisor's rollup for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorSnapshot {
    /// Advisor (user) ID.
    pub advisor_id: Uuid,
    /// Advisor display name.
    pub advisor_name: String,
    /// Period granularity.
    pub period_type: PeriodType,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Households served.
    pub households: i32,
    /// AUM across households.
    pub total_aum: Decimal,
    /// Net new assets.
    pub new_aum: Decimal,
    /// Revenue.
    pub revenue: Decimal,
    /// Meetings held.
    pub meetings_held: i32,
    /// Tasks completed.
    pub tasks_completed: i32,
    /// Client retention rate, percent.
    pub client_retention_rate: Decimal,
    /// Free-form goal targets.
    pub goals: serde_json::Value,
}

impl AdvisorSnapshot {
    /// Value of one metric for this advisor.
    #[must_use]
    pub fn metric_value(&self, metric: AdvisorMetric) -> Decimal {
        match metric {
            AdvisorMetric::Revenue => self.revenue,
            AdvisorMetric::TotalAum => self.total_aum,
            AdvisorMetric::NewAum => self.new_aum,
            AdvisorMetric::Households => Decimal::from(self.households),
            AdvisorMetric::MeetingsHeld => Decimal::from(self.meetings_held),
            AdvisorMetric::TasksCompleted => Decimal::from(self.tasks_completed),
        }
    }

    /// All metric values, keyed for goal matching.
    #[must_use]
    pub fn actuals(&self) -> BTreeMap<AdvisorMetric, Decimal> {
        AdvisorMetric::ALL
            .into_iter()
            .map(|metric| (metric, self.metric_value(metric)))
            .collect()
    }
}

/// Firm-wide rollup for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmSnapshot {
    /// Period granularity.
    pub period_type: PeriodType,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Total AUM.
    pub total_aum: Decimal,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Household count.
    pub total_households: i32,
    /// Advisor count.
    pub total_advisors: i32,
    /// Mean household profitability score.
    pub average_profitability_score: Decimal,
    /// Net new assets.
    pub net_new_assets: Decimal,
}

impl FirmSnapshot {
    /// AUM per advisor, zero without advisors.
    #[must_use]
    pub fn aum_per_advisor(&self) -> Decimal {
        if self.total_advisors > 0 {
            (self.total_aum / Decimal::from(self.total_advisors)).round_dp(2)
        } else {
            Decimal::ZERO
        }
    }

    /// Revenue per household, zero without households.
    #[must_use]
    pub fn revenue_per_household(&self) -> Decimal {
        if self.total_households > 0 {
            (self.total_revenue / Decimal::from(self.total_households)).round_dp(2)
        } else {
            Decimal::ZERO
        }
    }
}
