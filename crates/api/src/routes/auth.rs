//! Authentication routes.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use validator::Validate;

use crate::{AppState, error::ApiError};
use hearth_core::auth::{UserRole, verify_password};
use hearth_db::UserRepository;
use hearth_shared::auth::{LoginResponse, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// POST /auth/login - Authenticate user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.validate()?;

    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(&payload.email).await? else {
        tracing::info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    if !user.is_active {
        return Err(ApiError::unauthorized("This account has been disabled"));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let role = UserRole::from(user.role);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, role.as_str())?;

    tracing::info!(user_id = %user.id, role = %role, "User logged in");

    Ok(Json(LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: role.as_str().to_string(),
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}
