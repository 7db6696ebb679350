//! Household profitability scoring.
//!
//! Turns stored revenue, cost, and time inputs into margins, per-hour
//! figures, an effective fee rate, a 0-100 composite score, and a tier.

pub mod error;
pub mod scoring;
pub mod summary;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ProfitabilityError;
pub use scoring::ProfitabilityService;
pub use summary::{PortfolioSummary, ScoredHousehold, TierDistribution};
pub use types::{
    CostRates, ProfitabilityInputs, ProfitabilityMetrics, ProfitabilityTier, ScoreBreakdown,
};
