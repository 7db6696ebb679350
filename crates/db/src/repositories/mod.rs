//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod activity;
pub mod advisor_metrics;
pub mod custom_field;
pub mod firm_metrics;
pub mod household;
pub mod outlook;
pub mod preference;
pub mod profitability;
pub mod saved_view;
pub mod tag;
pub mod user;
pub mod workflow;

pub use activity::{ActivityRepository, ActivityRepositoryError};
pub use advisor_metrics::{
    AdvisorMetricsInput, AdvisorMetricsRepository, AdvisorMetricsRepositoryError,
};
pub use custom_field::{
    CreateFieldDefinitionInput, CustomFieldRepository, CustomFieldRepositoryError,
    EntityFieldValue, UpdateFieldDefinitionInput,
};
pub use firm_metrics::{FirmMetricsInput, FirmMetricsRepository};
pub use household::HouseholdRepository;
pub use outlook::{
    OutlookItemFilter, OutlookRepository, OutlookRepositoryError, SyncOutlookItemInput,
};
pub use preference::PreferenceRepository;
pub use profitability::{
    ProfitabilityFilter, ProfitabilityRepository, ProfitabilityRepositoryError,
};
pub use saved_view::{
    CreateSavedViewInput, SavedViewRepository, SavedViewRepositoryError, UpdateSavedViewInput,
};
pub use tag::{CreateTagInput, TagRepository, TagRepositoryError, UpdateTagInput};
pub use user::UserRepository;
pub use workflow::{
    CreateTemplateInput, InstanceFilter, UpdateTemplateInput, WorkflowRepository,
    WorkflowRepositoryError,
};

use sea_orm::{DbErr, SqlErr};

/// True when the error is a unique constraint or unique index violation.
///
/// Existence checks ahead of a write can race with another writer; the
/// constraint catches what they miss.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_constraint_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DbErr::Custom("boom".to_string())));
        assert!(!is_unique_violation(&DbErr::RecordNotUpdated));
        assert!(!is_unique_violation(&DbErr::RecordNotFound(
            "saved_views".to_string()
        )));
    }
}
