//! Per-user daily activity counters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::AnalyticsError;

/// Kind of activity being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Phone call logged.
    Call,
    /// Email sent or logged.
    Email,
    /// Meeting held.
    Meeting,
    /// Note written.
    Note,
    /// Task completed.
    TaskCompleted,
    /// Periodic client review.
    ClientReview,
}

impl ActivityType {
    /// All activity types.
    pub const ALL: [Self; 6] = [
        Self::Call,
        Self::Email,
        Self::Meeting,
        Self::Note,
        Self::TaskCompleted,
        Self::ClientReview,
    ];

    /// Returns the stored key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Note => "note",
            Self::TaskCompleted => "task_completed",
            Self::ClientReview => "client_review",
        }
    }

    /// Parses a stored key.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::UnknownActivityType` for unrecognized keys.
    pub fn parse(s: &str) -> Result<Self, AnalyticsError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AnalyticsError::UnknownActivityType(s.to_string()))
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity counts summed over a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTotals {
    /// Count per activity type; every type is present.
    pub by_type: BTreeMap<ActivityType, i64>,
    /// Sum over all types.
    pub total: i64,
}

impl ActivityTotals {
    /// Sums `(type, count)` rows. Types with no rows report zero.
    #[must_use]
    pub fn from_counts<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (ActivityType, i64)>,
    {
        let mut by_type: BTreeMap<ActivityType, i64> =
            ActivityType::ALL.into_iter().map(|t| (t, 0)).collect();
        let mut total = 0i64;
        for (activity_type, count) in rows {
            let slot = by_type.entry(activity_type).or_insert(0);
            *slot = slot.saturating_add(count);
            total = total.saturating_add(count);
        }
        Self { by_type, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(
            ActivityType::parse("task_completed").unwrap(),
            ActivityType::TaskCompleted
        );
        assert!(matches!(
            ActivityType::parse("fax"),
            Err(AnalyticsError::UnknownActivityType(_))
        ));
    }

    #[test]
    fn test_totals_fill_missing_types() {
        let totals = ActivityTotals::from_counts([
            (ActivityType::Call, 3),
            (ActivityType::Meeting, 2),
            (ActivityType::Call, 4),
        ]);

        assert_eq!(totals.total, 9);
        assert_eq!(totals.by_type[&ActivityType::Call], 7);
        assert_eq!(totals.by_type[&ActivityType::Meeting], 2);
        assert_eq!(totals.by_type[&ActivityType::Email], 0);
        assert_eq!(totals.by_type.len(), ActivityType::ALL.len());
    }
}
