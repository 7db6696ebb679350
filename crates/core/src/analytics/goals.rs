//! Goal tracking against the free-form `goals` bag on advisor metrics.
//!
//! Goals are stored as a JSON object mapping a metric key to a numeric
//! target, e.g. `{"revenue": "1200000", "new_aum": "5000000"}`. Targets
//! carry at most two decimals and positive targets are at least 0.01.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::error::AnalyticsError;
use super::types::AdvisorMetric;

/// Smallest positive goal target.
pub const MIN_POSITIVE_TARGET: Decimal = dec!(0.01);

/// Progress toward one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Targeted metric.
    pub metric: AdvisorMetric,
    /// Target value.
    pub target: Decimal,
    /// Current value.
    pub actual: Decimal,
    /// actual / target × 100, zero for targets below 0.01.
    pub progress_percent: Decimal,
    /// Whether the target has been met.
    pub achieved: bool,
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Computes progress for every recognizable goal.
///
/// Keys that are not advisor metrics and targets that are not numeric are
/// skipped. Results are ordered by metric.
#[must_use]
pub fn goal_progress(goals: &Value, actuals: &BTreeMap<AdvisorMetric, Decimal>) -> Vec<GoalProgress> {
    let Some(object) = goals.as_object() else {
        return Vec::new();
    };

    let mut targets: BTreeMap<AdvisorMetric, Decimal> = BTreeMap::new();
    for (key, raw) in object {
        if let (Ok(metric), Some(target)) = (AdvisorMetric::parse(key), decimal_from_json(raw)) {
            targets.insert(metric, target.round_dp(2));
        }
    }

    targets
        .into_iter()
        .map(|(metric, target)| {
            let actual = actuals.get(&metric).copied().unwrap_or(Decimal::ZERO);
            let progress_percent = if target > Decimal::ZERO {
                actual
                    .checked_div(target)
                    .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                    .map_or(Decimal::MAX, |percent| percent.round_dp(2))
            } else {
                Decimal::ZERO
            };
            GoalProgress {
                metric,
                target,
                actual,
                progress_percent,
                achieved: target > Decimal::ZERO && actual >= target,
            }
        })
        .collect()
}

/// Applies a goals patch to the stored goals.
///
/// Patch keys must be advisor metrics. A numeric value sets the target,
/// rounded to two decimals; `null` removes it. Stored keys are normalized
/// to snake_case.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidGoals` if the patch is not an object,
/// names an unknown metric, or carries a non-numeric, negative, or
/// positive-but-below-0.01 target.
pub fn merge_goals(existing: &Value, patch: &Value) -> Result<Value, AnalyticsError> {
    let patch = patch
        .as_object()
        .ok_or_else(|| AnalyticsError::InvalidGoals("patch is not an object".to_string()))?;

    let mut merged: Map<String, Value> = existing.as_object().cloned().unwrap_or_default();

    for (key, raw) in patch {
        let metric = AdvisorMetric::parse(key)
            .map_err(|_| AnalyticsError::InvalidGoals(format!("unknown metric '{key}'")))?;
        if raw.is_null() {
            merged.remove(key);
            merged.remove(metric.as_str());
            continue;
        }
        let target = decimal_from_json(raw)
            .ok_or_else(|| AnalyticsError::InvalidGoals(format!("'{key}' is not numeric")))?;
        if target < Decimal::ZERO {
            return Err(AnalyticsError::InvalidGoals(format!("'{key}' is negative")));
        }
        if target > Decimal::ZERO && target < MIN_POSITIVE_TARGET {
            return Err(AnalyticsError::InvalidGoals(format!(
                "'{key}' must be zero or at least 0.01"
            )));
        }
        let target = target.round_dp(2).normalize();
        merged.remove(key);
        merged.insert(metric.as_str().to_string(), Value::String(target.to_string()));
    }

    Ok(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actuals() -> BTreeMap<AdvisorMetric, Decimal> {
        BTreeMap::from([
            (AdvisorMetric::Revenue, dec!(900000)),
            (AdvisorMetric::NewAum, dec!(6000000)),
            (AdvisorMetric::MeetingsHeld, dec!(40)),
        ])
    }

    #[test]
    fn test_progress_for_numeric_goals() {
        let goals = json!({ "revenue": 1200000, "newAum": "5000000" });
        let progress = goal_progress(&goals, &actuals());

        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].metric, AdvisorMetric::Revenue);
        assert_eq!(progress[0].progress_percent, dec!(75));
        assert!(!progress[0].achieved);
        assert_eq!(progress[1].metric, AdvisorMetric::NewAum);
        assert_eq!(progress[1].progress_percent, dec!(120));
        assert!(progress[1].achieved);
    }

    #[test]
    fn test_unknown_and_non_numeric_goals_skipped() {
        let goals = json!({ "revenue": "lots", "golf_rounds": 12, "meetings_held": 40 });
        let progress = goal_progress(&goals, &actuals());

        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].metric, AdvisorMetric::MeetingsHeld);
        assert!(progress[0].achieved);
    }

    #[test]
    fn test_zero_target_never_achieved() {
        let progress = goal_progress(&json!({ "tasks_completed": 0 }), &actuals());
        assert_eq!(progress[0].progress_percent, Decimal::ZERO);
        assert!(!progress[0].achieved);
    }

    #[test]
    fn test_non_object_goals() {
        assert!(goal_progress(&json!(null), &actuals()).is_empty());
        assert!(goal_progress(&json!([1, 2]), &actuals()).is_empty());
    }

    #[test]
    fn test_merge_sets_normalizes_and_removes() {
        let existing = json!({ "revenue": "1000000", "meetingsHeld": "30" });
        let patch = json!({ "meetingsHeld": null, "newAum": 2500000, "revenue": 1100000 });

        let merged = merge_goals(&existing, &patch).unwrap();

        assert_eq!(
            merged,
            json!({ "revenue": "1100000", "new_aum": "2500000" })
        );
    }

    #[test]
    fn test_merge_rejects_bad_patches() {
        let existing = json!({});
        assert!(merge_goals(&existing, &json!([1])).is_err());
        assert!(merge_goals(&existing, &json!({ "golf_rounds": 3 })).is_err());
        assert!(merge_goals(&existing, &json!({ "revenue": "many" })).is_err());
        assert!(merge_goals(&existing, &json!({ "revenue": -5 })).is_err());
    }

    #[test]
    fn test_merge_rejects_sub_cent_targets() {
        let existing = json!({});
        let patch = json!({ "revenue": "0.0000000000000000000000001" });
        let result = merge_goals(&existing, &patch);
        assert!(matches!(result, Err(AnalyticsError::InvalidGoals(_))));
        assert!(merge_goals(&existing, &json!({ "revenue": "0.009" })).is_err());
    }

    #[test]
    fn test_merge_rounds_targets_to_cents() {
        let patch = json!({ "revenue": "1250.555", "new_aum": 0 });
        let merged = merge_goals(&json!({}), &patch).unwrap();
        assert_eq!(merged, json!({ "revenue": "1250.56", "new_aum": "0" }));
    }

    #[test]
    fn test_progress_survives_stored_sub_cent_target() {
        let goals = json!({ "revenue": "0.0000000000000000000000001", "new_aum": "0.01" });
        let actuals = BTreeMap::from([
            (AdvisorMetric::Revenue, dec!(1000000000)),
            (AdvisorMetric::NewAum, dec!(99999999999999999.99)),
        ]);

        let progress = goal_progress(&goals, &actuals);

        assert_eq!(progress[0].metric, AdvisorMetric::Revenue);
        assert_eq!(progress[0].progress_percent, Decimal::ZERO);
        assert!(!progress[0].achieved);
        assert_eq!(progress[1].metric, AdvisorMetric::NewAum);
        assert_eq!(progress[1].progress_percent, dec!(999999999999999999900));
        assert!(progress[1].achieved);
    }
}
