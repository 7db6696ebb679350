//! Tag and tag-association routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{double_option, parse_entity_type};
use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_db::TagRepository;
use hearth_db::repositories::{CreateTagInput, UpdateTagInput};

/// Creates the tag routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customization/tags", get(list_tags).post(create_tag))
        .route("/customization/tags/tree", get(tag_tree))
        .route(
            "/customization/tags/entity",
            post(tag_entity).delete(untag_entity),
        )
        .route(
            "/customization/tags/entity/{entity_type}/{entity_id}",
            get(entity_tags),
        )
        .route(
            "/customization/tags/{id}",
            patch(update_tag).delete(deactivate_tag),
        )
}

/// Request body for creating a tag.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// `#RRGGBB` color.
    pub color: Option<String>,
    /// Description.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Parent tag.
    pub parent_id: Option<Uuid>,
}

/// Request body for updating a tag.
#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    /// Display name.
    pub name: Option<String>,
    /// Color; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
    /// Description; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Parent; `null` makes the tag a root.
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

/// Request body for tagging or untagging an entity.
#[derive(Debug, Deserialize)]
pub struct EntityTagRequest {
    /// Tag ID.
    pub tag_id: Uuid,
    /// Entity type.
    pub entity_type: String,
    /// Entity ID.
    pub entity_id: Uuid,
}

/// GET `/customization/tags` - List active tags.
async fn list_tags(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tags = TagRepository::new((*state.db).clone()).list().await?;
    Ok(Json(json!({ "tags": tags })))
}

/// GET `/customization/tags/tree` - Active tags as a hierarchy.
async fn tag_tree(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tree = TagRepository::new((*state.db).clone()).tree().await?;
    Ok(Json(json!({ "tags": tree })))
}

/// POST `/customization/tags` - Create a tag.
async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_tags(), "manage tags")?;
    payload.validate()?;

    let tag = TagRepository::new((*state.db).clone())
        .create(CreateTagInput {
            name: payload.name,
            color: payload.color,
            description: payload.description,
            parent_id: payload.parent_id,
            created_by: auth.user_id(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// PATCH `/customization/tags/{id}` - Update a tag.
async fn update_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_tags(), "manage tags")?;

    let tag = TagRepository::new((*state.db).clone())
        .update(
            id,
            UpdateTagInput {
                name: payload.name,
                color: payload.color,
                description: payload.description,
                parent_id: payload.parent_id,
            },
        )
        .await?;

    Ok(Json(tag))
}

/// DELETE `/customization/tags/{id}` - Retire a tag.
async fn deactivate_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_tags(), "manage tags")?;

    TagRepository::new((*state.db).clone()).deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/customization/tags/entity` - Tag an entity.
///
/// Answers 201 for a new association and 200 when it already existed.
async fn tag_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<EntityTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    let entity_type = parse_entity_type(&payload.entity_type)?;

    let (link, created) = TagRepository::new((*state.db).clone())
        .tag_entity(payload.tag_id, entity_type, payload.entity_id, auth.user_id())
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(link)))
}

/// DELETE `/customization/tags/entity` - Untag an entity.
async fn untag_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<EntityTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    let entity_type = parse_entity_type(&payload.entity_type)?;

    TagRepository::new((*state.db).clone())
        .untag_entity(payload.tag_id, entity_type, payload.entity_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET `/customization/tags/entity/{entity_type}/{entity_id}` - Tags on an entity.
async fn entity_tags(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let entity_type = parse_entity_type(&entity_type)?;

    let tags = TagRepository::new((*state.db).clone())
        .tags_for_entity(entity_type, entity_id)
        .await?;

    Ok(Json(json!({
        "entity_type": entity_type,
        "entity_id": entity_id,
        "tags": tags
    })))
}
