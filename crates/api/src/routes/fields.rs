//! Custom field definition and value routes.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use super::{double_option, parse_entity_type};
use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_core::customization::{EntityType, FieldType};
use hearth_db::CustomFieldRepository;
use hearth_db::repositories::{
    CreateFieldDefinitionInput, EntityFieldValue, UpdateFieldDefinitionInput,
};

/// Creates the custom field routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customization/fields", get(list_fields).post(create_field))
        .route(
            "/customization/fields/{id}",
            get(get_field).patch(update_field).delete(deactivate_field),
        )
        .route(
            "/customization/field-values/{entity_type}/{entity_id}",
            get(get_values).put(set_values),
        )
        .route(
            "/customization/field-values/{entity_type}/{entity_id}/{field_id}",
            delete(delete_value),
        )
}

/// Query parameters for listing field definitions.
#[derive(Debug, Deserialize)]
pub struct ListFieldsQuery {
    /// Restrict to one entity type.
    pub entity_type: Option<String>,
    /// Include retired definitions.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating a field definition.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFieldRequest {
    /// Entity type the field applies to.
    pub entity_type: String,
    /// Key, unique per entity type.
    #[validate(length(min = 1, max = 64))]
    pub field_key: String,
    /// Display label.
    #[validate(length(min = 1, max = 200))]
    pub label: String,
    /// Declared type.
    pub field_type: String,
    /// Whether a value must be present.
    #[serde(default)]
    pub is_required: bool,
    /// Choice list for select types.
    #[serde(default)]
    pub options: Vec<String>,
    /// Inclusive lower bound.
    pub min_value: Option<Decimal>,
    /// Inclusive upper bound.
    pub max_value: Option<Decimal>,
    /// Default shown by clients.
    pub default_value: Option<Value>,
    /// Display order.
    #[serde(default)]
    pub sort_order: i32,
    /// Help text.
    #[validate(length(max = 1000))]
    pub help_text: Option<String>,
}

/// Request body for updating a field definition.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFieldRequest {
    /// Display label.
    #[validate(length(min = 1, max = 200))]
    pub label: Option<String>,
    /// Required flag.
    pub is_required: Option<bool>,
    /// Choice list.
    pub options: Option<Vec<String>>,
    /// Lower bound; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub min_value: Option<Option<Decimal>>,
    /// Upper bound; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub max_value: Option<Option<Decimal>>,
    /// Default value; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub default_value: Option<Option<Value>>,
    /// Display order.
    pub sort_order: Option<i32>,
    /// Help text; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub help_text: Option<Option<String>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Request body for writing field values.
#[derive(Debug, Deserialize)]
pub struct SetValuesRequest {
    /// Field ID to raw value; `null` clears an optional field.
    pub values: HashMap<Uuid, Option<Value>>,
}

/// A field and the entity's value for it.
#[derive(Debug, Serialize)]
pub struct FieldValueResponse {
    /// Field definition ID.
    pub field_id: Uuid,
    /// Field key.
    pub field_key: String,
    /// Display label.
    pub label: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Whether the field is required.
    pub is_required: bool,
    /// Current value, `null` when unset.
    pub value: Value,
}

impl From<EntityFieldValue> for FieldValueResponse {
    fn from(item: EntityFieldValue) -> Self {
        Self {
            field_id: item.definition.id,
            field_key: item.definition.field_key,
            label: item.definition.label,
            field_type: item.definition.field_type.into(),
            is_required: item.definition.is_required,
            value: item.value.map_or(Value::Null, |v| v.to_json()),
        }
    }
}

/// GET `/customization/fields` - List field definitions.
async fn list_fields(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListFieldsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entity_type = query
        .entity_type
        .as_deref()
        .map(parse_entity_type)
        .transpose()?;

    let fields = CustomFieldRepository::new((*state.db).clone())
        .list_definitions(entity_type, query.include_inactive)
        .await?;

    Ok(Json(json!({ "fields": fields })))
}

/// POST `/customization/fields` - Create a field definition.
async fn create_field(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateFieldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_fields(), "manage custom fields")?;
    payload.validate()?;

    let input = CreateFieldDefinitionInput {
        entity_type: EntityType::parse(&payload.entity_type)?,
        field_key: payload.field_key,
        label: payload.label,
        field_type: FieldType::parse(&payload.field_type)?,
        is_required: payload.is_required,
        options: payload.options,
        min_value: payload.min_value,
        max_value: payload.max_value,
        default_value: payload.default_value,
        sort_order: payload.sort_order,
        help_text: payload.help_text,
        created_by: auth.user_id(),
    };

    let field = CustomFieldRepository::new((*state.db).clone())
        .create_definition(input)
        .await?;

    Ok((StatusCode::CREATED, Json(field)))
}

/// GET `/customization/fields/{id}` - Get a field definition.
async fn get_field(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let field = CustomFieldRepository::new((*state.db).clone())
        .find_definition(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Custom field not found: {id}")))?;

    Ok(Json(field))
}

/// PATCH `/customization/fields/{id}` - Update a field definition.
async fn update_field(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFieldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_fields(), "manage custom fields")?;
    payload.validate()?;

    let input = UpdateFieldDefinitionInput {
        label: payload.label,
        is_required: payload.is_required,
        options: payload.options,
        min_value: payload.min_value,
        max_value: payload.max_value,
        default_value: payload.default_value,
        sort_order: payload.sort_order,
        help_text: payload.help_text,
        is_active: payload.is_active,
    };

    let field = CustomFieldRepository::new((*state.db).clone())
        .update_definition(id, input)
        .await?;

    Ok(Json(field))
}

/// DELETE `/customization/fields/{id}` - Retire a field definition.
async fn deactivate_field(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_manage_fields(), "manage custom fields")?;

    CustomFieldRepository::new((*state.db).clone())
        .deactivate_definition(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET `/customization/field-values/{entity_type}/{entity_id}` - An entity's field values.
async fn get_values(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let entity_type = parse_entity_type(&entity_type)?;

    let values: Vec<FieldValueResponse> = CustomFieldRepository::new((*state.db).clone())
        .values_for_entity(entity_type, entity_id)
        .await?
        .into_iter()
        .map(FieldValueResponse::from)
        .collect();

    Ok(Json(json!({
        "entity_type": entity_type,
        "entity_id": entity_id,
        "values": values
    })))
}

/// PUT `/customization/field-values/{entity_type}/{entity_id}` - Write field values.
async fn set_values(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
    Json(payload): Json<SetValuesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    let entity_type = parse_entity_type(&entity_type)?;
    if payload.values.is_empty() {
        return Err(ApiError::bad_request("values must not be empty"));
    }

    let values: Vec<FieldValueResponse> = CustomFieldRepository::new((*state.db).clone())
        .set_values(
            entity_type,
            entity_id,
            payload.values.into_iter().collect(),
            auth.user_id(),
        )
        .await?
        .into_iter()
        .map(FieldValueResponse::from)
        .collect();

    Ok(Json(json!({
        "entity_type": entity_type,
        "entity_id": entity_id,
        "values": values
    })))
}

/// DELETE `/customization/field-values/{entity_type}/{entity_id}/{field_id}` - Clear one value.
async fn delete_value(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((entity_type, entity_id, field_id)): Path<(String, Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    let entity_type = parse_entity_type(&entity_type)?;

    CustomFieldRepository::new((*state.db).clone())
        .delete_value(entity_type, entity_id, field_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
