//! Analytics error types.

use hearth_shared::AppError;
use thiserror::Error;

/// Analytics-related errors.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Unknown advisor metric name.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Unknown activity type.
    #[error("Unknown activity type: {0}")]
    UnknownActivityType(String),

    /// Goals must be a JSON object of metric to numeric target.
    #[error("Goals must be an object of numeric targets: {0}")]
    InvalidGoals(String),

    /// Activity count must be positive.
    #[error("Activity count must be positive")]
    NonPositiveCount,

    /// Date range ends before it starts.
    #[error("Date range ends before it starts")]
    InvalidDateRange,
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        Self::Validation(err.to_string())
    }
}
