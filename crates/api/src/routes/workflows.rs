//! Workflow template and instance routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{double_option, parse_entity_type};
use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_core::workflow::{WorkflowStatus, WorkflowStep};
use hearth_db::WorkflowRepository;
use hearth_db::repositories::{CreateTemplateInput, InstanceFilter, UpdateTemplateInput};

/// Creates the workflow routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workflows/templates",
            get(list_templates).post(create_template),
        )
        .route(
            "/workflows/templates/{id}",
            get(get_template)
                .patch(update_template)
                .delete(deactivate_template),
        )
        .route(
            "/workflows/instances",
            get(list_instances).post(start_instance),
        )
        .route("/workflows/instances/{id}", get(get_instance))
        .route("/workflows/instances/{id}/advance", post(advance_instance))
        .route("/workflows/instances/{id}/cancel", post(cancel_instance))
}

/// Query parameters for listing templates.
#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    /// Restrict to one entity type.
    pub entity_type: Option<String>,
    /// Include retired templates.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query parameters for listing instances.
#[derive(Debug, Deserialize)]
pub struct ListInstancesQuery {
    /// Restrict to one template.
    pub template_id: Option<Uuid>,
    /// Restrict to one entity type.
    pub entity_type: Option<String>,
    /// Restrict to one entity.
    pub entity_id: Option<Uuid>,
    /// `active`, `completed` or `cancelled`.
    pub status: Option<String>,
}

/// Request body for creating a template.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    /// Template name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Entity type instances attach to.
    pub entity_type: String,
    /// Ordered steps.
    #[validate(length(min = 1, max = 100))]
    pub steps: Vec<WorkflowStep>,
}

/// Request body for updating a template.
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    /// New name.
    pub name: Option<String>,
    /// New description; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Replacement steps.
    pub steps: Option<Vec<WorkflowStep>>,
}

/// Request body for starting an instance.
#[derive(Debug, Deserialize)]
pub struct StartInstanceRequest {
    /// Template to run.
    pub template_id: Uuid,
    /// Entity the run is about.
    pub entity_id: Uuid,
}

/// Request body for completing a step.
#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    /// Notes recorded with the completion.
    pub notes: Option<String>,
}

/// Request body for cancelling an instance.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    /// Why the run stopped.
    pub reason: Option<String>,
}

/// GET `/workflows/templates` - List templates.
async fn list_templates(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListTemplatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entity_type = query
        .entity_type
        .as_deref()
        .map(parse_entity_type)
        .transpose()?;

    let templates = WorkflowRepository::new((*state.db).clone())
        .list_templates(entity_type, query.include_inactive)
        .await?;

    Ok(Json(json!({ "templates": templates })))
}

/// POST `/workflows/templates` - Create a template.
async fn create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_workflows(), "manage workflow templates")?;
    payload.validate()?;

    let template = WorkflowRepository::new((*state.db).clone())
        .create_template(
            auth.user_id(),
            CreateTemplateInput {
                name: payload.name,
                description: payload.description,
                entity_type: parse_entity_type(&payload.entity_type)?,
                steps: payload.steps,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(template)))
}

/// GET `/workflows/templates/{id}` - Get a template.
async fn get_template(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let template = WorkflowRepository::new((*state.db).clone())
        .find_template(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Workflow template not found: {id}")))?;

    Ok(Json(template))
}

/// PATCH `/workflows/templates/{id}` - Update a template.
async fn update_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_workflows(), "manage workflow templates")?;

    let template = WorkflowRepository::new((*state.db).clone())
        .update_template(
            id,
            UpdateTemplateInput {
                name: payload.name,
                description: payload.description,
                steps: payload.steps,
            },
        )
        .await?;

    Ok(Json(template))
}

/// DELETE `/workflows/templates/{id}` - Retire a template.
async fn deactivate_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_workflows(), "manage workflow templates")?;

    WorkflowRepository::new((*state.db).clone())
        .deactivate_template(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET `/workflows/instances` - List instances.
async fn list_instances(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListInstancesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            WorkflowStatus::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("unknown status '{raw}'")))?,
        ),
        None => None,
    };
    let filter = InstanceFilter {
        template_id: query.template_id,
        entity_type: query
            .entity_type
            .as_deref()
            .map(parse_entity_type)
            .transpose()?,
        entity_id: query.entity_id,
        status,
    };

    let instances = WorkflowRepository::new((*state.db).clone())
        .list_instances(&filter)
        .await?;

    Ok(Json(json!({ "instances": instances })))
}

/// POST `/workflows/instances` - Start an instance.
async fn start_instance(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<StartInstanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;

    let instance = WorkflowRepository::new((*state.db).clone())
        .start_instance(payload.template_id, payload.entity_id, auth.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(instance)))
}

/// GET `/workflows/instances/{id}` - Get an instance.
async fn get_instance(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let instance = WorkflowRepository::new((*state.db).clone())
        .find_instance(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Workflow instance not found: {id}")))?;

    Ok(Json(instance))
}

/// POST `/workflows/instances/{id}/advance` - Complete the current step.
async fn advance_instance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<AdvanceRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    let notes = payload.and_then(|Json(p)| p.notes);

    let instance = WorkflowRepository::new((*state.db).clone())
        .advance_instance(id, auth.user_id(), notes)
        .await?;

    Ok(Json(instance))
}

/// POST `/workflows/instances/{id}/cancel` - Cancel an instance.
async fn cancel_instance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<CancelRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    let reason = payload.and_then(|Json(p)| p.reason);

    let instance = WorkflowRepository::new((*state.db).clone())
        .cancel_instance(id, auth.user_id(), reason)
        .await?;

    Ok(Json(instance))
}
