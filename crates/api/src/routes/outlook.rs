//! Outlook item sync and household tagging routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_db::OutlookRepository;
use hearth_db::entities::sea_orm_active_enums::OutlookItemKind;
use hearth_db::repositories::{OutlookItemFilter, SyncOutlookItemInput};

/// Largest page the list endpoint returns.
const MAX_LIMIT: u64 = 500;

/// Creates the Outlook routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/outlook/items", get(list_items).post(sync_item))
        .route(
            "/outlook/items/{id}/household",
            put(tag_household).delete(untag_household),
        )
}

/// Query parameters for listing items.
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// `email` or `event`.
    pub kind: Option<String>,
    /// Only items tagged to this household.
    pub household_id: Option<Uuid>,
    /// Only items with no household.
    #[serde(default)]
    pub untagged: bool,
    /// Maximum rows (default 100).
    pub limit: Option<u64>,
}

/// Request body for a synced item.
#[derive(Debug, Deserialize, Validate)]
pub struct SyncItemRequest {
    /// `email` or `event`.
    pub kind: String,
    /// Identifier assigned by Outlook.
    #[validate(length(min = 1, max = 512))]
    pub external_id: String,
    /// Subject or event title.
    #[validate(length(min = 1, max = 1000))]
    pub subject: String,
    /// Sender or organizer.
    pub participant: Option<String>,
    /// Sent/received time or event start.
    pub occurred_at: DateTime<Utc>,
    /// Household to tag on first sync.
    pub household_id: Option<Uuid>,
}

/// Request body for tagging an item.
#[derive(Debug, Deserialize)]
pub struct TagHouseholdRequest {
    /// Household to tag.
    pub household_id: Uuid,
}

fn parse_kind(raw: &str) -> Result<OutlookItemKind, ApiError> {
    OutlookItemKind::parse(raw)
        .ok_or_else(|| ApiError::bad_request(format!("unknown item kind '{raw}'")))
}

/// GET `/outlook/items` - List synced items.
async fn list_items(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = OutlookItemFilter {
        kind: query.kind.as_deref().map(parse_kind).transpose()?,
        household_id: query.household_id,
        untagged: query.untagged,
        limit: Some(query.limit.unwrap_or(100).clamp(1, MAX_LIMIT)),
    };

    let items = OutlookRepository::new((*state.db).clone())
        .list(&filter)
        .await?;

    Ok(Json(json!({ "items": items })))
}

/// POST `/outlook/items` - Record a synced item.
async fn sync_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SyncItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    payload.validate()?;

    let item = OutlookRepository::new((*state.db).clone())
        .upsert_item(
            auth.user_id(),
            SyncOutlookItemInput {
                kind: parse_kind(&payload.kind)?,
                external_id: payload.external_id,
                subject: payload.subject,
                participant: payload.participant,
                occurred_at: payload.occurred_at,
                household_id: payload.household_id,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

/// PUT `/outlook/items/{id}/household` - Tag an item to a household.
async fn tag_household(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TagHouseholdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;

    let item = OutlookRepository::new((*state.db).clone())
        .set_household(id, payload.household_id, auth.user_id())
        .await?;

    Ok(Json(item))
}

/// DELETE `/outlook/items/{id}/household` - Remove an item's household tag.
async fn untag_household(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;

    let item = OutlookRepository::new((*state.db).clone())
        .clear_household(id)
        .await?;

    Ok(Json(item))
}
