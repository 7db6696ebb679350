//! Scoring rule tests, including the property-based checks.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::scoring::ProfitabilityService;
use super::summary::{PortfolioSummary, ScoredHousehold};
use super::types::{
    CostRates, MAX_AMOUNT, MAX_FEE_RATE, MAX_MARGIN, ProfitabilityInputs, ProfitabilityTier,
};
use super::ProfitabilityError;

/// The "Smith Family" fixture row: 72,250 revenue, 50 hours, 28,900 total cost.
fn smith_family() -> ProfitabilityInputs {
    ProfitabilityInputs {
        aum: dec!(6500000),
        management_fee_revenue: dec!(65000),
        planning_fee_revenue: dec!(5000),
        other_revenue: dec!(2250),
        advisor_hours: dec!(40),
        operations_hours: dec!(5),
        compliance_hours: dec!(5),
        technology_cost: dec!(5900),
        custodian_cost: dec!(4000),
        marketing_cost: dec!(3000),
        overhead_cost: dec!(5000),
    }
}

#[test]
fn test_smith_family_fixture_values() {
    let m = ProfitabilityService::calculate(&smith_family(), &CostRates::default()).unwrap();

    assert_eq!(m.total_revenue, dec!(72250));
    assert_eq!(m.direct_labor_cost, dec!(11000));
    assert_eq!(m.total_cost, dec!(28900));
    assert_eq!(m.gross_profit, dec!(61250));
    assert_eq!(m.net_profit, dec!(43350));
    assert_eq!(m.net_margin, dec!(60.00));
    assert_eq!(m.gross_margin, dec!(84.78));
    assert_eq!(m.total_hours, dec!(50));
    assert_eq!(m.revenue_per_hour, dec!(1445.00));
    assert_eq!(m.profit_per_hour, dec!(867.00));
    assert_eq!(m.effective_fee_rate, dec!(0.011115));
    // 50 (margin) + 21.675 (rev/hr) + 20 (fee, capped)
    assert_eq!(m.score, dec!(91.68));
    assert_eq!(m.tier, ProfitabilityTier::Platinum);
}

#[test]
fn test_zero_revenue_leaves_margins_at_zero() {
    let inputs = ProfitabilityInputs {
        management_fee_revenue: Decimal::ZERO,
        planning_fee_revenue: Decimal::ZERO,
        other_revenue: Decimal::ZERO,
        ..smith_family()
    };
    let m = ProfitabilityService::calculate(&inputs, &CostRates::default()).unwrap();

    assert_eq!(m.gross_margin, Decimal::ZERO);
    assert_eq!(m.net_margin, Decimal::ZERO);
    assert_eq!(m.net_profit, dec!(-28900));
    assert_eq!(m.tier, ProfitabilityTier::Bronze);
}

#[test]
fn test_zero_hours_leaves_per_hour_fields_at_zero() {
    let inputs = ProfitabilityInputs {
        advisor_hours: Decimal::ZERO,
        operations_hours: Decimal::ZERO,
        compliance_hours: Decimal::ZERO,
        ..smith_family()
    };
    let m = ProfitabilityService::calculate(&inputs, &CostRates::default()).unwrap();

    assert_eq!(m.direct_labor_cost, Decimal::ZERO);
    assert_eq!(m.revenue_per_hour, Decimal::ZERO);
    assert_eq!(m.profit_per_hour, Decimal::ZERO);
}

#[test]
fn test_zero_aum_leaves_fee_rate_at_zero() {
    let inputs = ProfitabilityInputs {
        aum: Decimal::ZERO,
        ..smith_family()
    };
    let m = ProfitabilityService::calculate(&inputs, &CostRates::default()).unwrap();

    assert_eq!(m.effective_fee_rate, Decimal::ZERO);
    assert_eq!(m.score, dec!(71.68));
    assert_eq!(m.tier, ProfitabilityTier::Gold);
}

#[test]
fn test_all_zero_inputs() {
    let m = ProfitabilityService::calculate(&ProfitabilityInputs::default(), &CostRates::default())
        .unwrap();
    assert_eq!(m.score, Decimal::ZERO);
    assert_eq!(m.tier, ProfitabilityTier::Bronze);
}

#[test]
fn test_custom_rates_change_labor_cost() {
    let rates = CostRates {
        advisor: dec!(300),
        operations: dec!(50),
        compliance: dec!(100),
    };
    let m = ProfitabilityService::calculate(&smith_family(), &rates).unwrap();
    assert_eq!(m.direct_labor_cost, dec!(12750));
}

#[test]
fn test_negative_input_rejected() {
    let inputs = ProfitabilityInputs {
        advisor_hours: dec!(-1),
        ..smith_family()
    };
    let result = ProfitabilityService::calculate(&inputs, &CostRates::default());
    assert!(matches!(
        result,
        Err(ProfitabilityError::NegativeInput("advisor_hours"))
    ));
}

#[test]
fn test_negative_rate_rejected() {
    let rates = CostRates {
        compliance: dec!(-125),
        ..CostRates::default()
    };
    let result = ProfitabilityService::calculate(&smith_family(), &rates);
    assert!(matches!(
        result,
        Err(ProfitabilityError::NegativeRate("compliance"))
    ));
}

#[test]
fn test_hours_beyond_stored_precision_rejected() {
    let inputs = ProfitabilityInputs {
        advisor_hours: Decimal::MAX,
        management_fee_revenue: dec!(1000),
        ..ProfitabilityInputs::default()
    };
    let result = ProfitabilityService::calculate(&inputs, &CostRates::default());
    assert!(matches!(
        result,
        Err(ProfitabilityError::InputOutOfRange("advisor_hours"))
    ));
}

#[test]
fn test_amount_beyond_stored_precision_rejected() {
    let inputs = ProfitabilityInputs {
        overhead_cost: dec!(100000000000000000),
        ..smith_family()
    };
    let result = ProfitabilityService::calculate(&inputs, &CostRates::default());
    assert!(matches!(
        result,
        Err(ProfitabilityError::InputOutOfRange("overhead_cost"))
    ));
}

#[test]
fn test_sub_cent_hours_round_to_zero() {
    let inputs = ProfitabilityInputs {
        compliance_hours: dec!(0.0000000000000000000001),
        management_fee_revenue: dec!(10000000000000),
        ..ProfitabilityInputs::default()
    };
    let m = ProfitabilityService::calculate(&inputs, &CostRates::default()).unwrap();
    assert_eq!(m.total_hours, Decimal::ZERO);
    assert_eq!(m.direct_labor_cost, Decimal::ZERO);
    assert_eq!(m.revenue_per_hour, Decimal::ZERO);
}

#[test]
fn test_inputs_are_scored_at_stored_scale() {
    let inputs = ProfitabilityInputs {
        advisor_hours: dec!(0.004),
        management_fee_revenue: dec!(1000.005),
        ..ProfitabilityInputs::default()
    };
    let m = ProfitabilityService::calculate(&inputs, &CostRates::default()).unwrap();
    assert_eq!(m.total_hours, Decimal::ZERO);
    assert_eq!(m.direct_labor_cost, Decimal::ZERO);
    assert_eq!(m.total_revenue, dec!(1000.00));
    assert_eq!(
        ProfitabilityService::calculate(&inputs.normalized(), &CostRates::default()).unwrap(),
        m
    );
}

#[test]
fn test_extreme_ratios_saturate() {
    let inputs = ProfitabilityInputs {
        aum: dec!(0.01),
        management_fee_revenue: dec!(99999999999999999.99),
        advisor_hours: dec!(0.01),
        ..ProfitabilityInputs::default()
    };
    let m = ProfitabilityService::calculate(&inputs, &CostRates::default()).unwrap();
    assert_eq!(m.revenue_per_hour, MAX_AMOUNT);
    assert_eq!(m.effective_fee_rate, MAX_FEE_RATE);
    assert_eq!(m.score, dec!(100));

    let losing = ProfitabilityInputs {
        management_fee_revenue: dec!(0.01),
        overhead_cost: dec!(1000000),
        ..ProfitabilityInputs::default()
    };
    let m = ProfitabilityService::calculate(&losing, &CostRates::default()).unwrap();
    assert_eq!(m.net_margin, -MAX_MARGIN);
    assert_eq!(m.score, Decimal::ZERO);
}

#[test]
fn test_totals_beyond_stored_precision_rejected() {
    let inputs = ProfitabilityInputs {
        management_fee_revenue: MAX_AMOUNT,
        planning_fee_revenue: MAX_AMOUNT,
        ..ProfitabilityInputs::default()
    };
    let result = ProfitabilityService::calculate(&inputs, &CostRates::default());
    assert!(matches!(
        result,
        Err(ProfitabilityError::Overflow("total_revenue"))
    ));

    let rates = CostRates {
        advisor: Decimal::MAX,
        ..CostRates::default()
    };
    let result = ProfitabilityService::calculate(&smith_family(), &rates);
    assert!(matches!(
        result,
        Err(ProfitabilityError::Overflow("direct_labor_cost"))
    ));
}

#[rstest]
#[case(dec!(100), ProfitabilityTier::Platinum)]
#[case(dec!(85), ProfitabilityTier::Platinum)]
#[case(dec!(84.999), ProfitabilityTier::Gold)]
#[case(dec!(70), ProfitabilityTier::Gold)]
#[case(dec!(69.999), ProfitabilityTier::Silver)]
#[case(dec!(50), ProfitabilityTier::Silver)]
#[case(dec!(49.999), ProfitabilityTier::Bronze)]
#[case(dec!(0), ProfitabilityTier::Bronze)]
fn test_tier_boundaries_are_inclusive(#[case] score: Decimal, #[case] tier: ProfitabilityTier) {
    assert_eq!(ProfitabilityService::tier_for_score(score), tier);
}

#[test]
fn test_portfolio_summary() {
    let rates = CostRates::default();
    let smith = ProfitabilityService::calculate(&smith_family(), &rates).unwrap();
    let lean = ProfitabilityService::calculate(
        &ProfitabilityInputs {
            management_fee_revenue: dec!(10000),
            advisor_hours: dec!(20),
            ..ProfitabilityInputs::default()
        },
        &rates,
    )
    .unwrap();

    let rows = vec![
        ScoredHousehold {
            household_id: Uuid::new_v4(),
            household_name: "Jones Household".to_string(),
            metrics: lean,
        },
        ScoredHousehold {
            household_id: Uuid::new_v4(),
            household_name: "Smith Family".to_string(),
            metrics: smith,
        },
    ];

    let summary = PortfolioSummary::from_rows(&rows, 1);

    assert_eq!(summary.household_count, 2);
    assert_eq!(summary.total_revenue, dec!(82250));
    // 43350 + (10000 - 5000)
    assert_eq!(summary.total_net_profit, dec!(48350));
    assert_eq!(summary.average_net_margin, dec!(58.78));
    assert_eq!(summary.tiers.platinum, 1);
    assert_eq!(summary.tiers.bronze, 1);
    assert_eq!(summary.top_households.len(), 1);
    assert_eq!(summary.top_households[0].household_name, "Smith Family");
}

#[test]
fn test_empty_portfolio_summary() {
    let summary = PortfolioSummary::from_rows(&[], 5);
    assert_eq!(summary.household_count, 0);
    assert_eq!(summary.average_score, Decimal::ZERO);
    assert_eq!(summary.average_net_margin, Decimal::ZERO);
    assert!(summary.top_households.is_empty());
}

/// Non-negative amounts with cents across the full stored range.
fn amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2)),
        (0i128..=9_999_999_999_999_999_999)
            .prop_map(|cents| Decimal::from_i128_with_scale(cents, 2)),
    ]
}

/// Hours across the stored range, including sub-cent positive values.
fn hours() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (0i64..100_000).prop_map(|n| Decimal::new(n, 1)),
        (1i64..1_000, 3u32..=28).prop_map(|(n, scale)| Decimal::new(n, scale)),
        (0i64..=9_999_999_999).prop_map(|n| Decimal::new(n, 2)),
    ]
}

/// Signed percentages with two decimals, -200% to 200%.
fn margin() -> impl Strategy<Value = Decimal> {
    (-20_000i64..20_000).prop_map(|bp| Decimal::new(bp, 2))
}

/// Fee rates from 0 to 5%, six decimals.
fn fee_rate() -> impl Strategy<Value = Decimal> {
    (0i64..50_000).prop_map(|n| Decimal::new(n, 6))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Score is non-decreasing in net margin with the other inputs held fixed.
    #[test]
    fn prop_score_monotonic_in_margin(
        a in margin(), b in margin(), rph in amount(), fee in fee_rate(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            ProfitabilityService::composite_score(lo, rph, fee)
                <= ProfitabilityService::composite_score(hi, rph, fee)
        );
    }

    /// Score is non-decreasing in revenue per hour with the other inputs held fixed.
    #[test]
    fn prop_score_monotonic_in_revenue_per_hour(
        m in margin(), a in amount(), b in amount(), fee in fee_rate(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            ProfitabilityService::composite_score(m, lo, fee)
                <= ProfitabilityService::composite_score(m, hi, fee)
        );
    }

    /// Score is non-decreasing in fee rate with the other inputs held fixed.
    #[test]
    fn prop_score_monotonic_in_fee_rate(
        m in margin(), rph in amount(), a in fee_rate(), b in fee_rate(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            ProfitabilityService::composite_score(m, rph, lo)
                <= ProfitabilityService::composite_score(m, rph, hi)
        );
    }

    /// Any input in or beyond the stored range yields metrics or a range
    /// error. Successful results are bounded, tier-consistent, and stable
    /// when rescored from the stored inputs.
    #[test]
    fn prop_calculate_total_over_stored_range(
        aum in amount(),
        fees in amount(),
        other in amount(),
        advisor_hours in hours(),
        compliance_hours in hours(),
        overhead in amount(),
    ) {
        let inputs = ProfitabilityInputs {
            aum,
            management_fee_revenue: fees,
            other_revenue: other,
            advisor_hours,
            compliance_hours,
            overhead_cost: overhead,
            ..ProfitabilityInputs::default()
        };
        match ProfitabilityService::calculate(&inputs, &CostRates::default()) {
            Ok(m) => {
                prop_assert!(m.score >= Decimal::ZERO);
                prop_assert!(m.score <= Decimal::ONE_HUNDRED);
                prop_assert_eq!(m.tier, ProfitabilityService::tier_for_score(m.score));
                prop_assert_eq!(m.net_profit, m.total_revenue - m.total_cost);
                prop_assert!(m.total_cost <= MAX_AMOUNT);
                prop_assert!(m.revenue_per_hour <= MAX_AMOUNT);
                prop_assert!(m.net_margin.abs() <= MAX_MARGIN);
                prop_assert!(m.effective_fee_rate <= MAX_FEE_RATE);
                let stored = inputs.normalized();
                prop_assert_eq!(
                    ProfitabilityService::calculate(&stored, &CostRates::default()).unwrap(),
                    m
                );
            }
            Err(err) => prop_assert!(matches!(
                err,
                ProfitabilityError::Overflow(_) | ProfitabilityError::InputOutOfRange(_)
            )),
        }
    }
}
