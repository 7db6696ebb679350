//! Saved view routes. Every view belongs to the caller.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::parse_entity_type;
use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_db::SavedViewRepository;
use hearth_db::repositories::{CreateSavedViewInput, UpdateSavedViewInput};

/// Creates the saved view routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customization/views", get(list_views).post(create_view))
        .route(
            "/customization/views/{id}",
            patch(update_view).delete(delete_view),
        )
        .route("/customization/views/{id}/default", post(set_default_view))
}

/// Query parameters for listing views.
#[derive(Debug, Deserialize)]
pub struct ListViewsQuery {
    /// Restrict to one entity type.
    pub entity_type: Option<String>,
}

/// Request body for creating a view.
#[derive(Debug, Deserialize)]
pub struct CreateViewRequest {
    /// Entity type the view lists.
    pub entity_type: String,
    /// Display name.
    pub name: String,
    /// Columns, filters, sort and page size.
    pub config: Value,
    /// Make this the default for the entity type.
    #[serde(default)]
    pub is_default: bool,
}

/// Request body for updating a view.
#[derive(Debug, Deserialize)]
pub struct UpdateViewRequest {
    /// Display name.
    pub name: Option<String>,
    /// Replacement config.
    pub config: Option<Value>,
}

/// GET `/customization/views` - The caller's views.
async fn list_views(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListViewsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entity_type = query
        .entity_type
        .as_deref()
        .map(parse_entity_type)
        .transpose()?;

    let views = SavedViewRepository::new((*state.db).clone())
        .list(auth.user_id(), entity_type)
        .await?;

    Ok(Json(json!({ "views": views })))
}

/// POST `/customization/views` - Save a view.
async fn create_view(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateViewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = SavedViewRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateSavedViewInput {
                entity_type: parse_entity_type(&payload.entity_type)?,
                name: payload.name,
                config: payload.config,
                is_default: payload.is_default,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH `/customization/views/{id}` - Rename a view or replace its config.
async fn update_view(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateViewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = SavedViewRepository::new((*state.db).clone())
        .update(
            id,
            auth.user_id(),
            UpdateSavedViewInput {
                name: payload.name,
                config: payload.config,
            },
        )
        .await?;

    Ok(Json(view))
}

/// DELETE `/customization/views/{id}` - Delete a view.
async fn delete_view(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    SavedViewRepository::new((*state.db).clone())
        .delete(id, auth.user_id())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST `/customization/views/{id}/default` - Make a view the default.
async fn set_default_view(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = SavedViewRepository::new((*state.db).clone())
        .set_default(id, auth.user_id())
        .await?;

    Ok(Json(view))
}
