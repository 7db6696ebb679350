//! Profitability data types.

use hearth_shared::ScoringConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ProfitabilityError;

/// Largest storable money amount, NUMERIC(19, 2).
pub const MAX_AMOUNT: Decimal = dec!(99999999999999999.99);
/// Largest storable hour count, NUMERIC(10, 2).
pub const MAX_HOURS: Decimal = dec!(99999999.99);
/// Largest storable margin in percent, NUMERIC(9, 2).
pub const MAX_MARGIN: Decimal = dec!(9999999.99);
/// Largest storable effective fee rate, NUMERIC(12, 6).
pub const MAX_FEE_RATE: Decimal = dec!(999999.999999);

/// Hourly cost of each labor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRates {
    /// Advisor hourly cost.
    pub advisor: Decimal,
    /// Operations hourly cost.
    pub operations: Decimal,
    /// Compliance hourly cost.
    pub compliance: Decimal,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            advisor: Decimal::from(250),
            operations: Decimal::from(75),
            compliance: Decimal::from(125),
        }
    }
}

impl CostRates {
    /// Rejects negative rates.
    pub fn validate(&self) -> Result<(), ProfitabilityError> {
        for (name, rate) in [
            ("advisor", self.advisor),
            ("operations", self.operations),
            ("compliance", self.compliance),
        ] {
            if rate < Decimal::ZERO {
                return Err(ProfitabilityError::NegativeRate(name));
            }
        }
        Ok(())
    }
}

impl From<&ScoringConfig> for CostRates {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            advisor: config.advisor_hourly_rate,
            operations: config.operations_hourly_rate,
            compliance: config.compliance_hourly_rate,
        }
    }
}

/// Stored inputs for one household and period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitabilityInputs {
    /// Assets under management at period end.
    pub aum: Decimal,
    /// Asset-based management fees.
    pub management_fee_revenue: Decimal,
    /// Flat planning fees.
    pub planning_fee_revenue: Decimal,
    /// Any other revenue (insurance commissions, etc.).
    pub other_revenue: Decimal,
    /// Advisor hours spent on the household.
    pub advisor_hours: Decimal,
    /// Operations hours spent on the household.
    pub operations_hours: Decimal,
    /// Compliance hours spent on the household.
    pub compliance_hours: Decimal,
    /// Allocated technology cost.
    pub technology_cost: Decimal,
    /// Custodian fees absorbed by the firm.
    pub custodian_cost: Decimal,
    /// Allocated marketing cost.
    pub marketing_cost: Decimal,
    /// Allocated overhead.
    pub overhead_cost: Decimal,
}

impl ProfitabilityInputs {
    /// Rounds every input to cents (hours to hundredths), the stored scale.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            aum: self.aum.round_dp(2),
            management_fee_revenue: self.management_fee_revenue.round_dp(2),
            planning_fee_revenue: self.planning_fee_revenue.round_dp(2),
            other_revenue: self.other_revenue.round_dp(2),
            advisor_hours: self.advisor_hours.round_dp(2),
            operations_hours: self.operations_hours.round_dp(2),
            compliance_hours: self.compliance_hours.round_dp(2),
            technology_cost: self.technology_cost.round_dp(2),
            custodian_cost: self.custodian_cost.round_dp(2),
            marketing_cost: self.marketing_cost.round_dp(2),
            overhead_cost: self.overhead_cost.round_dp(2),
        }
    }

    /// Rejects negative values and values beyond the stored precision.
    pub fn validate(&self) -> Result<(), ProfitabilityError> {
        let fields = [
            ("aum", self.aum, MAX_AMOUNT),
            ("management_fee_revenue", self.management_fee_revenue, MAX_AMOUNT),
            ("planning_fee_revenue", self.planning_fee_revenue, MAX_AMOUNT),
            ("other_revenue", self.other_revenue, MAX_AMOUNT),
            ("advisor_hours", self.advisor_hours, MAX_HOURS),
            ("operations_hours", self.operations_hours, MAX_HOURS),
            ("compliance_hours", self.compliance_hours, MAX_HOURS),
            ("technology_cost", self.technology_cost, MAX_AMOUNT),
            ("custodian_cost", self.custodian_cost, MAX_AMOUNT),
            ("marketing_cost", self.marketing_cost, MAX_AMOUNT),
            ("overhead_cost", self.overhead_cost, MAX_AMOUNT),
        ];
        for (name, value, max) in fields {
            if value < Decimal::ZERO {
                return Err(ProfitabilityError::NegativeInput(name));
            }
            if value > max {
                return Err(ProfitabilityError::InputOutOfRange(name));
            }
        }
        Ok(())
    }

    /// Sum of all revenue components.
    pub fn total_revenue(&self) -> Result<Decimal, ProfitabilityError> {
        checked_sum(
            "total_revenue",
            [self.management_fee_revenue, self.planning_fee_revenue, self.other_revenue],
        )
    }

    /// Sum of all labor hours.
    pub fn total_hours(&self) -> Result<Decimal, ProfitabilityError> {
        checked_sum(
            "total_hours",
            [self.advisor_hours, self.operations_hours, self.compliance_hours],
        )
    }

    /// Sum of the non-labor cost components.
    pub fn non_labor_cost(&self) -> Result<Decimal, ProfitabilityError> {
        checked_sum(
            "total_cost",
            [self.technology_cost, self.custodian_cost, self.marketing_cost, self.overhead_cost],
        )
    }
}

fn checked_sum<const N: usize>(
    name: &'static str,
    values: [Decimal; N],
) -> Result<Decimal, ProfitabilityError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or(ProfitabilityError::Overflow(name))
}

/// Derived profitability figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitabilityMetrics {
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Σ hours × rate over the three labor categories.
    pub direct_labor_cost: Decimal,
    /// Direct labor plus technology, custodian, marketing, overhead.
    pub total_cost: Decimal,
    /// Revenue minus direct labor.
    pub gross_profit: Decimal,
    /// Revenue minus total cost.
    pub net_profit: Decimal,
    /// Gross profit / revenue × 100, zero without revenue.
    pub gross_margin: Decimal,
    /// Net profit / revenue × 100, zero without revenue.
    pub net_margin: Decimal,
    /// Total labor hours.
    pub total_hours: Decimal,
    /// Revenue per labor hour, zero without hours.
    pub revenue_per_hour: Decimal,
    /// Net profit per labor hour, zero without hours.
    pub profit_per_hour: Decimal,
    /// Revenue / AUM as a fraction, zero without AUM.
    pub effective_fee_rate: Decimal,
    /// Composite 0-100 score.
    pub score: Decimal,
    /// Tier derived from `score`.
    pub tier: ProfitabilityTier,
}

/// Sub-scores that make up the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Margin contribution, 0-50.
    pub margin: Decimal,
    /// Revenue-per-hour contribution, 0-30.
    pub revenue_per_hour: Decimal,
    /// Fee-rate contribution, 0-20.
    pub fee_rate: Decimal,
}

impl ScoreBreakdown {
    /// Sum of the three sub-scores.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.margin + self.revenue_per_hour + self.fee_rate
    }
}

/// Ordinal profitability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfitabilityTier {
    /// Score below 50.
    Bronze,
    /// Score 50 to below 70.
    Silver,
    /// Score 70 to below 85.
    Gold,
    /// Score 85 and above.
    Platinum,
}

impl ProfitabilityTier {
    /// All tiers, lowest first.
    pub const ALL: [Self; 4] = [Self::Bronze, Self::Silver, Self::Gold, Self::Platinum];

    /// Returns the string representation of the tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    /// Parses a tier from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }
}

impl fmt::Display for ProfitabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
