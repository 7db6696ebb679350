//! Profitability scoring rule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ProfitabilityError;
use super::types::{
    CostRates, MAX_AMOUNT, MAX_FEE_RATE, MAX_HOURS, MAX_MARGIN, ProfitabilityInputs,
    ProfitabilityMetrics, ProfitabilityTier, ScoreBreakdown,
};

/// Net margin (percent) that earns the full margin sub-score.
pub const TARGET_NET_MARGIN: Decimal = dec!(60);
/// Revenue per hour that earns the full revenue-per-hour sub-score.
pub const TARGET_REVENUE_PER_HOUR: Decimal = dec!(2000);
/// Effective fee rate (fraction) that earns the full fee-rate sub-score.
pub const TARGET_FEE_RATE: Decimal = dec!(0.01);

/// Maximum margin sub-score.
pub const MARGIN_POINTS: Decimal = dec!(50);
/// Maximum revenue-per-hour sub-score.
pub const REVENUE_PER_HOUR_POINTS: Decimal = dec!(30);
/// Maximum fee-rate sub-score.
pub const FEE_RATE_POINTS: Decimal = dec!(20);

/// Lowest score in the platinum tier.
pub const PLATINUM_THRESHOLD: Decimal = dec!(85);
/// Lowest score in the gold tier.
pub const GOLD_THRESHOLD: Decimal = dec!(70);
/// Lowest score in the silver tier.
pub const SILVER_THRESHOLD: Decimal = dec!(50);

/// Stateless profitability calculator.
pub struct ProfitabilityService;

impl ProfitabilityService {
    /// Computes every derived profitability field from stored inputs.
    ///
    /// Inputs are rounded to their stored scale first, so the result is the
    /// same whether it is computed on the request or on the persisted row.
    /// Ratios whose denominator is zero (revenue, hours, AUM) stay at zero.
    /// Ratios beyond their stored precision saturate at the bound; every
    /// sub-score is already capped well below those bounds.
    ///
    /// # Errors
    ///
    /// Returns `ProfitabilityError` if:
    /// - Any input or rate is negative
    /// - An input exceeds its stored precision
    /// - A derived total overflows or does not fit its stored precision
    pub fn calculate(
        inputs: &ProfitabilityInputs,
        rates: &CostRates,
    ) -> Result<ProfitabilityMetrics, ProfitabilityError> {
        let inputs = inputs.normalized();
        inputs.validate()?;
        rates.validate()?;

        let total_revenue = bounded("total_revenue", inputs.total_revenue()?, MAX_AMOUNT)?;
        let direct_labor_cost = [
            (inputs.advisor_hours, rates.advisor),
            (inputs.operations_hours, rates.operations),
            (inputs.compliance_hours, rates.compliance),
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (hours, rate)| {
            hours.checked_mul(rate).and_then(|cost| acc.checked_add(cost))
        })
        .ok_or(ProfitabilityError::Overflow("direct_labor_cost"))?
        .round_dp(2);
        let direct_labor_cost = bounded("direct_labor_cost", direct_labor_cost, MAX_AMOUNT)?;
        let total_cost = direct_labor_cost
            .checked_add(inputs.non_labor_cost()?)
            .ok_or(ProfitabilityError::Overflow("total_cost"))?;
        let total_cost = bounded("total_cost", total_cost, MAX_AMOUNT)?;

        let gross_profit =
            bounded("gross_profit", total_revenue - direct_labor_cost, MAX_AMOUNT)?;
        let net_profit = bounded("net_profit", total_revenue - total_cost, MAX_AMOUNT)?;

        let (gross_margin, net_margin) = if total_revenue > Decimal::ZERO {
            let gross = percent_of("gross_margin", gross_profit, total_revenue)?;
            let net = percent_of("net_margin", net_profit, total_revenue)?;
            (
                saturated(gross, MAX_MARGIN),
                saturated(net, MAX_MARGIN),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let total_hours = bounded("total_hours", inputs.total_hours()?, MAX_HOURS)?;
        let (revenue_per_hour, profit_per_hour) = if total_hours > Decimal::ZERO {
            let revenue = ratio("revenue_per_hour", total_revenue, total_hours, 2)?;
            let profit = ratio("profit_per_hour", net_profit, total_hours, 2)?;
            (
                saturated(revenue, MAX_AMOUNT),
                saturated(profit, MAX_AMOUNT),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let effective_fee_rate = if inputs.aum > Decimal::ZERO {
            let fee_rate = ratio("effective_fee_rate", total_revenue, inputs.aum, 6)?;
            saturated(fee_rate, MAX_FEE_RATE)
        } else {
            Decimal::ZERO
        };

        let score = Self::composite_score(net_margin, revenue_per_hour, effective_fee_rate);

        Ok(ProfitabilityMetrics {
            total_revenue,
            direct_labor_cost,
            total_cost,
            gross_profit,
            net_profit,
            gross_margin,
            net_margin,
            total_hours,
            revenue_per_hour,
            profit_per_hour,
            effective_fee_rate,
            score,
            tier: Self::tier_for_score(score),
        })
    }

    /// Splits a score into its three clamped sub-scores.
    #[must_use]
    pub fn score_breakdown(
        net_margin: Decimal,
        revenue_per_hour: Decimal,
        effective_fee_rate: Decimal,
    ) -> ScoreBreakdown {
        ScoreBreakdown {
            margin: scaled_points(net_margin, TARGET_NET_MARGIN, MARGIN_POINTS),
            revenue_per_hour: scaled_points(
                revenue_per_hour,
                TARGET_REVENUE_PER_HOUR,
                REVENUE_PER_HOUR_POINTS,
            ),
            fee_rate: scaled_points(effective_fee_rate, TARGET_FEE_RATE, FEE_RATE_POINTS),
        }
    }

    /// Composite 0-100 score, rounded to 2 dp.
    #[must_use]
    pub fn composite_score(
        net_margin: Decimal,
        revenue_per_hour: Decimal,
        effective_fee_rate: Decimal,
    ) -> Decimal {
        Self::score_breakdown(net_margin, revenue_per_hour, effective_fee_rate)
            .total()
            .round_dp(2)
    }

    /// Maps a score to its tier. Thresholds are inclusive.
    #[must_use]
    pub fn tier_for_score(score: Decimal) -> ProfitabilityTier {
        if score >= PLATINUM_THRESHOLD {
            ProfitabilityTier::Platinum
        } else if score >= GOLD_THRESHOLD {
            ProfitabilityTier::Gold
        } else if score >= SILVER_THRESHOLD {
            ProfitabilityTier::Silver
        } else {
            ProfitabilityTier::Bronze
        }
    }
}

/// `value / target × max`, clamped to `[0, max]`.
fn scaled_points(value: Decimal, target: Decimal, max: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    value
        .checked_div(target)
        .and_then(|share| share.checked_mul(max))
        .map_or(max, |points| points.min(max))
}

/// `numerator / denominator` rounded to `dp` places.
fn ratio(
    name: &'static str,
    numerator: Decimal,
    denominator: Decimal,
    dp: u32,
) -> Result<Decimal, ProfitabilityError> {
    numerator
        .checked_div(denominator)
        .map(|r| r.round_dp(dp))
        .ok_or(ProfitabilityError::Overflow(name))
}

/// `part / whole × 100` rounded to 2 dp.
fn percent_of(
    name: &'static str,
    part: Decimal,
    whole: Decimal,
) -> Result<Decimal, ProfitabilityError> {
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map(|r| r.round_dp(2))
        .ok_or(ProfitabilityError::Overflow(name))
}

/// Clamps a ratio to `[-max, max]`.
fn saturated(value: Decimal, max: Decimal) -> Decimal {
    value.clamp(-max, max)
}

/// Rejects values whose magnitude exceeds `max`.
fn bounded(name: &'static str, value: Decimal, max: Decimal) -> Result<Decimal, ProfitabilityError> {
    if value.abs() > max {
        Err(ProfitabilityError::Overflow(name))
    } else {
        Ok(value)
    }
}
