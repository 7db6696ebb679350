//! User preference routes. Keys are scoped to the caller.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_core::customization::validate_preference_key;
use hearth_db::PreferenceRepository;

/// Creates the preference routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customization/preferences", get(list_preferences))
        .route(
            "/customization/preferences/{key}",
            get(get_preference)
                .put(put_preference)
                .delete(delete_preference),
        )
}

/// Request body for storing a preference.
#[derive(Debug, Deserialize)]
pub struct PutPreferenceRequest {
    /// Any JSON value.
    pub value: Value,
}

/// GET `/customization/preferences` - All of the caller's preferences as one object.
async fn list_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let preferences: serde_json::Map<String, Value> =
        PreferenceRepository::new((*state.db).clone())
            .list(auth.user_id())
            .await?
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect();

    Ok(Json(json!({ "preferences": preferences })))
}

/// GET `/customization/preferences/{key}` - One preference.
async fn get_preference(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_preference_key(&key)?;

    let preference = PreferenceRepository::new((*state.db).clone())
        .get(auth.user_id(), &key)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Preference not found: {key}")))?;

    Ok(Json(json!({ "key": preference.key, "value": preference.value })))
}

/// PUT `/customization/preferences/{key}` - Store a preference.
async fn put_preference(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<PutPreferenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_preference_key(&key)?;

    let preference = PreferenceRepository::new((*state.db).clone())
        .upsert(auth.user_id(), &key, payload.value)
        .await?;

    Ok(Json(json!({ "key": preference.key, "value": preference.value })))
}

/// DELETE `/customization/preferences/{key}` - Remove a preference.
async fn delete_preference(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_preference_key(&key)?;

    let existed = PreferenceRepository::new((*state.db).clone())
        .delete(auth.user_id(), &key)
        .await?;
    if !existed {
        return Err(ApiError::not_found(format!("Preference not found: {key}")));
    }

    Ok(StatusCode::NO_CONTENT)
}
