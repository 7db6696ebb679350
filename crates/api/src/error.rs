//! Mapping of application errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;

use hearth_core::analytics::AnalyticsError;
use hearth_core::auth::PasswordError;
use hearth_core::customization::{CustomFieldError, TagError, ViewError};
use hearth_core::profitability::ProfitabilityError;
use hearth_core::workflow::WorkflowError;
use hearth_db::repositories::{
    ActivityRepositoryError, AdvisorMetricsRepositoryError, CustomFieldRepositoryError,
    OutlookRepositoryError, ProfitabilityRepositoryError, SavedViewRepositoryError,
    TagRepositoryError, WorkflowRepositoryError,
};
use hearth_shared::{AppError, JwtError};

/// Error returned by handlers.
///
/// Renders as `{"error": "<CODE>", "message": "<text>"}`. Database and
/// internal errors are logged and replaced with a generic message.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 403 with the given message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_internal() {
            tracing::error!(error = %self.0, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

macro_rules! from_domain_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self(err.into())
                }
            }
        )+
    };
}

from_domain_error!(
    AnalyticsError,
    ProfitabilityError,
    CustomFieldError,
    TagError,
    ViewError,
    WorkflowError,
    ActivityRepositoryError,
    AdvisorMetricsRepositoryError,
    CustomFieldRepositoryError,
    OutlookRepositoryError,
    ProfitabilityRepositoryError,
    SavedViewRepositoryError,
    TagRepositoryError,
    WorkflowRepositoryError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_renders_code_and_message() {
        let response =
            ApiError(AppError::Conflict("Tag name already exists: VIP".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "CONFLICT");
        assert_eq!(body["message"], "Conflict: Tag name already exists: VIP");
    }

    #[tokio::test]
    async fn test_database_error_message_is_hidden() {
        let response = ApiError::from(DbErr::Custom("relation \"tags\" does not exist".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_workflow_transition_is_unprocessable() {
        use hearth_core::workflow::WorkflowStatus;

        let err: ApiError = WorkflowError::InvalidTransition {
            from: WorkflowStatus::Completed,
            to: WorkflowStatus::Cancelled,
        }
        .into();
        assert_eq!(err.0.status_code(), 422);
    }
}
