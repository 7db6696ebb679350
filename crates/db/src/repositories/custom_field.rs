//! Custom field repository: definitions and EAV values.

use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use hearth_core::customization::{
    CustomFieldError, EntityType, FieldDefinitionSpec, FieldType, TypedFieldValue, ValueColumns,
    validate_definition, validate_field_value,
};
use hearth_shared::AppError;

use super::is_unique_violation;
use crate::entities::sea_orm_active_enums::CustomFieldType;
use crate::entities::{custom_field_definitions, custom_field_values};

/// Error types for custom field operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomFieldRepositoryError {
    /// Field definition not found (or inactive).
    #[error("Custom field not found: {0}")]
    FieldNotFound(Uuid),

    /// Field key already used for this entity type.
    #[error("Field key '{0}' already exists for this entity type")]
    DuplicateKey(String),

    /// Field belongs to another entity type.
    #[error("Field {field_id} does not apply to {entity_type}")]
    WrongEntityType {
        /// Field ID.
        field_id: Uuid,
        /// Requested entity type.
        entity_type: EntityType,
    },

    /// No stored value to delete.
    #[error("No value stored for field {0}")]
    ValueNotFound(Uuid),

    /// Definition or value failed validation.
    #[error(transparent)]
    Invalid(#[from] CustomFieldError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CustomFieldRepositoryError> for AppError {
    fn from(err: CustomFieldRepositoryError) -> Self {
        match err {
            CustomFieldRepositoryError::FieldNotFound(_)
            | CustomFieldRepositoryError::ValueNotFound(_) => Self::NotFound(err.to_string()),
            CustomFieldRepositoryError::DuplicateKey(_) => Self::Conflict(err.to_string()),
            CustomFieldRepositoryError::WrongEntityType { .. } => Self::Validation(err.to_string()),
            CustomFieldRepositoryError::Invalid(e) => e.into(),
            CustomFieldRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a field definition.
#[derive(Debug, Clone)]
pub struct CreateFieldDefinitionInput {
    /// Entity type the field applies to.
    pub entity_type: EntityType,
    /// Key, unique per entity type.
    pub field_key: String,
    /// Display label.
    pub label: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Whether a value must be present.
    pub is_required: bool,
    /// Choice list for select types.
    pub options: Vec<String>,
    /// Inclusive lower bound.
    pub min_value: Option<Decimal>,
    /// Inclusive upper bound.
    pub max_value: Option<Decimal>,
    /// Default shown by clients.
    pub default_value: Option<Value>,
    /// Display order.
    pub sort_order: i32,
    /// Help text.
    pub help_text: Option<String>,
    /// Creating user.
    pub created_by: Uuid,
}

/// Input for updating a field definition. Key and type are immutable.
#[derive(Debug, Clone, Default)]
pub struct UpdateFieldDefinitionInput {
    /// Display label.
    pub label: Option<String>,
    /// Required flag.
    pub is_required: Option<bool>,
    /// Choice list.
    pub options: Option<Vec<String>>,
    /// Lower bound.
    pub min_value: Option<Option<Decimal>>,
    /// Upper bound.
    pub max_value: Option<Option<Decimal>>,
    /// Default value.
    pub default_value: Option<Option<Value>>,
    /// Display order.
    pub sort_order: Option<i32>,
    /// Help text.
    pub help_text: Option<Option<String>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// A field definition together with the entity's current value, if any.
#[derive(Debug, Clone)]
pub struct EntityFieldValue {
    /// The field definition.
    pub definition: custom_field_definitions::Model,
    /// Stored value.
    pub value: Option<TypedFieldValue>,
}

/// Custom field repository.
#[derive(Debug, Clone)]
pub struct CustomFieldRepository {
    db: DatabaseConnection,
}

impl CustomFieldRepository {
    /// Creates a new custom field repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    /// Creates a field definition.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The definition is invalid (key format, missing options, min > max)
    /// - The key already exists for the entity type
    pub async fn create_definition(
        &self,
        input: CreateFieldDefinitionInput,
    ) -> Result<custom_field_definitions::Model, CustomFieldRepositoryError> {
        let spec = FieldDefinitionSpec {
            field_key: input.field_key.clone(),
            field_type: input.field_type,
            is_required: input.is_required,
            options: input.options.clone(),
            min_value: input.min_value,
            max_value: input.max_value,
        };
        validate_definition(&spec)?;
        if input.label.trim().is_empty() {
            return Err(CustomFieldError::EmptyLabel.into());
        }
        if let Some(default) = &input.default_value {
            validate_field_value(&spec, Some(default))?;
        }

        let existing = custom_field_definitions::Entity::find()
            .filter(custom_field_definitions::Column::EntityType.eq(input.entity_type.as_str()))
            .filter(custom_field_definitions::Column::FieldKey.eq(&input.field_key))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CustomFieldRepositoryError::DuplicateKey(input.field_key));
        }

        let field_key = input.field_key.clone();
        let now = chrono::Utc::now().into();
        let definition = custom_field_definitions::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(input.entity_type.as_str().to_string()),
            field_key: Set(input.field_key),
            label: Set(input.label.trim().to_string()),
            field_type: Set(CustomFieldType::from(input.field_type)),
            is_required: Set(input.is_required),
            is_active: Set(true),
            options: Set(Value::from(input.options)),
            min_value: Set(input.min_value),
            max_value: Set(input.max_value),
            default_value: Set(input.default_value),
            sort_order: Set(input.sort_order),
            help_text: Set(input.help_text),
            created_by: Set(Some(input.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = definition.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CustomFieldRepositoryError::DuplicateKey(field_key)
            } else {
                e.into()
            }
        })?;
        tracing::info!(
            field_id = %created.id,
            entity_type = %created.entity_type,
            field_key = %created.field_key,
            "Custom field created"
        );
        Ok(created)
    }

    /// Lists field definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_definitions(
        &self,
        entity_type: Option<EntityType>,
        include_inactive: bool,
    ) -> Result<Vec<custom_field_definitions::Model>, DbErr> {
        let mut query = custom_field_definitions::Entity::find()
            .order_by_asc(custom_field_definitions::Column::EntityType)
            .order_by_asc(custom_field_definitions::Column::SortOrder)
            .order_by_asc(custom_field_definitions::Column::FieldKey);

        if let Some(entity_type) = entity_type {
            query = query
                .filter(custom_field_definitions::Column::EntityType.eq(entity_type.as_str()));
        }
        if !include_inactive {
            query = query.filter(custom_field_definitions::Column::IsActive.eq(true));
        }

        query.all(&self.db).await
    }

    /// Finds a field definition by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_definition(
        &self,
        id: Uuid,
    ) -> Result<Option<custom_field_definitions::Model>, DbErr> {
        custom_field_definitions::Entity::find_by_id(id)
            .one(&self.db)
            .await
    }

    /// Updates a field definition and re-validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the field does not exist or the result is invalid.
    pub async fn update_definition(
        &self,
        id: Uuid,
        input: UpdateFieldDefinitionInput,
    ) -> Result<custom_field_definitions::Model, CustomFieldRepositoryError> {
        let existing = custom_field_definitions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomFieldRepositoryError::FieldNotFound(id))?;

        let mut spec = spec_from_model(&existing);
        if let Some(is_required) = input.is_required {
            spec.is_required = is_required;
        }
        if let Some(options) = &input.options {
            spec.options.clone_from(options);
        }
        if let Some(min) = input.min_value {
            spec.min_value = min;
        }
        if let Some(max) = input.max_value {
            spec.max_value = max;
        }
        validate_definition(&spec)?;
        if let Some(Some(default)) = &input.default_value {
            validate_field_value(&spec, Some(default))?;
        }

        let mut active: custom_field_definitions::ActiveModel = existing.into();
        if let Some(label) = input.label {
            if label.trim().is_empty() {
                return Err(CustomFieldError::EmptyLabel.into());
            }
            active.label = Set(label.trim().to_string());
        }
        if let Some(is_required) = input.is_required {
            active.is_required = Set(is_required);
        }
        if let Some(options) = input.options {
            active.options = Set(Value::from(options));
        }
        if let Some(min) = input.min_value {
            active.min_value = Set(min);
        }
        if let Some(max) = input.max_value {
            active.max_value = Set(max);
        }
        if let Some(default_value) = input.default_value {
            active.default_value = Set(default_value);
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }
        if let Some(help_text) = input.help_text {
            active.help_text = Set(help_text);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Soft-deletes a field definition. Stored values are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the field does not exist.
    pub async fn deactivate_definition(
        &self,
        id: Uuid,
    ) -> Result<custom_field_definitions::Model, CustomFieldRepositoryError> {
        self.update_definition(
            id,
            UpdateFieldDefinitionInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Returns every active field for the entity type with the entity's value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn values_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<Vec<EntityFieldValue>, DbErr> {
        let definitions = self.list_definitions(Some(entity_type), false).await?;

        let mut values: HashMap<Uuid, custom_field_values::Model> =
            custom_field_values::Entity::find()
                .filter(custom_field_values::Column::EntityType.eq(entity_type.as_str()))
                .filter(custom_field_values::Column::EntityId.eq(entity_id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|v| (v.field_id, v))
                .collect();

        Ok(definitions
            .into_iter()
            .map(|definition| {
                let value = values.remove(&definition.id).and_then(typed_from_model);
                EntityFieldValue { definition, value }
            })
            .collect())
    }

    /// Types and stores several values for one entity in a single transaction.
    ///
    /// A `None`/null value clears the stored row for an optional field.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is unknown, belongs to another entity type,
    /// or rejects its value. Nothing is written in that case.
    pub async fn set_values(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        values: Vec<(Uuid, Option<Value>)>,
        updated_by: Uuid,
    ) -> Result<Vec<EntityFieldValue>, CustomFieldRepositoryError> {
        let field_ids: Vec<Uuid> = values.iter().map(|(id, _)| *id).collect();
        let definitions: HashMap<Uuid, custom_field_definitions::Model> =
            custom_field_definitions::Entity::find()
                .filter(custom_field_definitions::Column::Id.is_in(field_ids))
                .filter(custom_field_definitions::Column::IsActive.eq(true))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect();

        // Validate everything before touching the database.
        let mut typed = Vec::with_capacity(values.len());
        for (field_id, raw) in values {
            let definition = definitions
                .get(&field_id)
                .ok_or(CustomFieldRepositoryError::FieldNotFound(field_id))?;
            if definition.entity_type != entity_type.as_str() {
                return Err(CustomFieldRepositoryError::WrongEntityType {
                    field_id,
                    entity_type,
                });
            }
            let value = validate_field_value(&spec_from_model(definition), raw.as_ref())?;
            typed.push((field_id, value));
        }

        let txn = self.db.begin().await?;
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        for (field_id, value) in typed {
            match value {
                Some(value) => {
                    let columns = value.into_columns();
                    let row = custom_field_values::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        field_id: Set(field_id),
                        entity_type: Set(entity_type.as_str().to_string()),
                        entity_id: Set(entity_id),
                        value_text: Set(columns.text),
                        value_number: Set(columns.number),
                        value_boolean: Set(columns.boolean),
                        value_date: Set(columns.date.map(Into::into)),
                        value_json: Set(columns.json),
                        updated_by: Set(Some(updated_by)),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    custom_field_values::Entity::insert(row)
                        .on_conflict(
                            OnConflict::columns([
                                custom_field_values::Column::FieldId,
                                custom_field_values::Column::EntityType,
                                custom_field_values::Column::EntityId,
                            ])
                            .update_columns([
                                custom_field_values::Column::ValueText,
                                custom_field_values::Column::ValueNumber,
                                custom_field_values::Column::ValueBoolean,
                                custom_field_values::Column::ValueDate,
                                custom_field_values::Column::ValueJson,
                                custom_field_values::Column::UpdatedBy,
                                custom_field_values::Column::UpdatedAt,
                            ])
                            .to_owned(),
                        )
                        .exec(&txn)
                        .await?;
                }
                None => {
                    custom_field_values::Entity::delete_many()
                        .filter(custom_field_values::Column::FieldId.eq(field_id))
                        .filter(custom_field_values::Column::EntityType.eq(entity_type.as_str()))
                        .filter(custom_field_values::Column::EntityId.eq(entity_id))
                        .exec(&txn)
                        .await?;
                }
            }
        }

        txn.commit().await?;

        tracing::debug!(
            entity_type = %entity_type,
            entity_id = %entity_id,
            "Custom field values updated"
        );

        Ok(self.values_for_entity(entity_type, entity_id).await?)
    }

    /// Deletes one stored value. Required fields cannot be cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown, required, or has no value.
    pub async fn delete_value(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        field_id: Uuid,
    ) -> Result<(), CustomFieldRepositoryError> {
        let definition = custom_field_definitions::Entity::find_by_id(field_id)
            .one(&self.db)
            .await?
            .ok_or(CustomFieldRepositoryError::FieldNotFound(field_id))?;
        validate_field_value(&spec_from_model(&definition), None)?;

        let result = custom_field_values::Entity::delete_many()
            .filter(custom_field_values::Column::FieldId.eq(field_id))
            .filter(custom_field_values::Column::EntityType.eq(entity_type.as_str()))
            .filter(custom_field_values::Column::EntityId.eq(entity_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CustomFieldRepositoryError::ValueNotFound(field_id));
        }
        Ok(())
    }
}

/// Builds the typing spec from a stored definition.
#[must_use]
pub fn spec_from_model(model: &custom_field_definitions::Model) -> FieldDefinitionSpec {
    let options = model
        .options
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|o| o.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    FieldDefinitionSpec {
        field_key: model.field_key.clone(),
        field_type: model.field_type.into(),
        is_required: model.is_required,
        options,
        min_value: model.min_value,
        max_value: model.max_value,
    }
}

fn typed_from_model(row: custom_field_values::Model) -> Option<TypedFieldValue> {
    TypedFieldValue::from_columns(ValueColumns {
        text: row.value_text,
        number: row.value_number,
        boolean: row.value_boolean,
        date: row.value_date.map(|d| d.with_timezone(&chrono::Utc)),
        json: row.value_json,
    })
}
