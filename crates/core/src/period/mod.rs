//! Reporting period bucketing.
//!
//! Profitability rows and advisor/firm rollups are keyed by a period type and
//! the first day of the period.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Calendar month.
    Monthly,
    /// Calendar quarter.
    Quarterly,
    /// Calendar year.
    Annual,
}

impl PeriodType {
    /// Returns the string representation of the period type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }

    /// Parses a period type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Some(Self::Monthly),
            "quarterly" | "quarter" => Some(Self::Quarterly),
            "annual" | "annually" | "year" | "yearly" => Some(Self::Annual),
            _ => None,
        }
    }

    const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annual => 12,
        }
    }

    /// Returns the period containing `date`.
    #[must_use]
    pub fn bounds(self, date: NaiveDate) -> PeriodBounds {
        let start_month = match self {
            Self::Monthly => date.month(),
            Self::Quarterly => (date.month0() / 3) * 3 + 1,
            Self::Annual => 1,
        };
        // Day 1 of a month between 1 and 12 always exists.
        let start = NaiveDate::from_ymd_opt(date.year(), start_month, 1).unwrap_or(date);
        PeriodBounds::starting_at(self, start)
    }

    /// Returns the period immediately before the one containing `date`.
    #[must_use]
    pub fn previous(self, date: NaiveDate) -> PeriodBounds {
        let current = self.bounds(date);
        let prior_start = current
            .start
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(current.start);
        PeriodBounds::starting_at(self, prior_start)
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive start/end dates of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBounds {
    /// Period granularity.
    pub period_type: PeriodType,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
}

impl PeriodBounds {
    fn starting_at(period_type: PeriodType, start: NaiveDate) -> Self {
        let end = start
            .checked_add_months(Months::new(period_type.months()))
            .and_then(|next| next.pred_opt())
            .unwrap_or(start);
        Self {
            period_type,
            start,
            end,
        }
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Human-readable label, e.g. `2026-03`, `2026-Q1`, `2026`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.period_type {
            PeriodType::Monthly => self.start.format("%Y-%m").to_string(),
            PeriodType::Quarterly => {
                format!("{}-Q{}", self.start.year(), self.start.month0() / 3 + 1)
            }
            PeriodType::Annual => self.start.year().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_bounds() {
        let bounds = PeriodType::Monthly.bounds(date(2024, 2, 17));
        assert_eq!(bounds.start, date(2024, 2, 1));
        assert_eq!(bounds.end, date(2024, 2, 29));
        assert_eq!(bounds.label(), "2024-02");
    }

    #[test]
    fn test_quarterly_bounds() {
        let bounds = PeriodType::Quarterly.bounds(date(2026, 8, 3));
        assert_eq!(bounds.start, date(2026, 7, 1));
        assert_eq!(bounds.end, date(2026, 9, 30));
        assert_eq!(bounds.label(), "2026-Q3");
    }

    #[test]
    fn test_annual_bounds() {
        let bounds = PeriodType::Annual.bounds(date(2026, 10, 19));
        assert_eq!(bounds.start, date(2026, 1, 1));
        assert_eq!(bounds.end, date(2026, 12, 31));
        assert_eq!(bounds.label(), "2026");
    }

    #[test]
    fn test_previous_period_crosses_year() {
        let prior = PeriodType::Quarterly.previous(date(2026, 2, 10));
        assert_eq!(prior.start, date(2025, 10, 1));
        assert_eq!(prior.end, date(2025, 12, 31));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(PeriodType::parse("Quarter"), Some(PeriodType::Quarterly));
        assert_eq!(PeriodType::parse("yearly"), Some(PeriodType::Annual));
        assert_eq!(PeriodType::parse("weekly"), None);
    }

    proptest! {
        #[test]
        fn prop_bounds_contain_anchor(days in 0i64..20_000, kind in 0u8..3) {
            let period_type = match kind {
                0 => PeriodType::Monthly,
                1 => PeriodType::Quarterly,
                _ => PeriodType::Annual,
            };
            let anchor = date(2000, 1, 1) + chrono::Duration::days(days);
            let bounds = period_type.bounds(anchor);

            prop_assert!(bounds.contains(anchor));
            prop_assert_eq!(bounds.start.day(), 1);
            prop_assert_eq!(period_type.previous(anchor).end.succ_opt(), Some(bounds.start));
        }
    }
}
