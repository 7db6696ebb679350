//! Advisor and firm analytics.
//!
//! This module provides:
//! - Percentile rankings of advisors on a chosen metric
//! - Goal progress against the free-form `goals` bag
//! - Activity counters and their period totals
//! - The dashboard payload assembled from those pieces

pub mod activity;
pub mod dashboard;
pub mod error;
pub mod goals;
pub mod percentile;
pub mod types;

pub use activity::{ActivityTotals, ActivityType};
pub use dashboard::DashboardSummary;
pub use error::AnalyticsError;
pub use goals::{GoalProgress, goal_progress, merge_goals};
pub use percentile::{PercentileRank, percentile_ranks};
pub use types::{AdvisorMetric, AdvisorSnapshot, FirmSnapshot};
