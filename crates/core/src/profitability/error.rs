//! Profitability error types.

use hearth_shared::AppError;
use thiserror::Error;

/// Profitability-related errors.
#[derive(Debug, Error)]
pub enum ProfitabilityError {
    /// An input amount or hour count was negative.
    #[error("{0} cannot be negative")]
    NegativeInput(&'static str),

    /// A configured hourly rate was negative.
    #[error("hourly rate for {0} cannot be negative")]
    NegativeRate(&'static str),

    /// An input exceeds the storable range.
    #[error("{0} exceeds the allowed range")]
    InputOutOfRange(&'static str),

    /// A derived figure overflowed or does not fit its stored precision.
    #[error("{0} is out of range for the given inputs")]
    Overflow(&'static str),
}

impl From<ProfitabilityError> for AppError {
    fn from(err: ProfitabilityError) -> Self {
        Self::Validation(err.to_string())
    }
}
