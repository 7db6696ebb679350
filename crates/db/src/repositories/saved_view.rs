//! Saved view repository.
//!
//! Default switching clears the previous default and sets the new one inside
//! a transaction; the partial unique index on `(user_id, entity_type) WHERE
//! is_default` rejects any concurrent writer that slips past.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use hearth_core::customization::{EntityType, ViewConfig, ViewError, validate_view_name};
use hearth_shared::AppError;

use super::is_unique_violation;
use crate::entities::saved_views;

/// Error types for saved view operations.
#[derive(Debug, thiserror::Error)]
pub enum SavedViewRepositoryError {
    /// View not found or owned by someone else.
    #[error("Saved view not found: {0}")]
    ViewNotFound(Uuid),

    /// Another request switched the default at the same time.
    #[error("Default {0} view changed concurrently, retry")]
    DefaultConflict(EntityType),

    /// Name or config invalid.
    #[error(transparent)]
    Invalid(#[from] ViewError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SavedViewRepositoryError> for AppError {
    fn from(err: SavedViewRepositoryError) -> Self {
        match err {
            SavedViewRepositoryError::ViewNotFound(_) => Self::NotFound(err.to_string()),
            SavedViewRepositoryError::DefaultConflict(_) => Self::Conflict(err.to_string()),
            SavedViewRepositoryError::Invalid(e) => e.into(),
            SavedViewRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a saved view.
#[derive(Debug, Clone)]
pub struct CreateSavedViewInput {
    /// Entity type the view lists.
    pub entity_type: EntityType,
    /// Display name.
    pub name: String,
    /// Raw view config.
    pub config: Value,
    /// Make this the user's default for the entity type.
    pub is_default: bool,
}

/// Input for updating a saved view.
#[derive(Debug, Clone, Default)]
pub struct UpdateSavedViewInput {
    /// Display name.
    pub name: Option<String>,
    /// Raw view config.
    pub config: Option<Value>,
}

/// Saved view repository.
#[derive(Debug, Clone)]
pub struct SavedViewRepository {
    db: DatabaseConnection,
}

impl SavedViewRepository {
    /// Creates a new saved view repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's views, defaults first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        entity_type: Option<EntityType>,
    ) -> Result<Vec<saved_views::Model>, DbErr> {
        let mut query = saved_views::Entity::find()
            .filter(saved_views::Column::UserId.eq(user_id))
            .order_by_asc(saved_views::Column::EntityType)
            .order_by_desc(saved_views::Column::IsDefault)
            .order_by_asc(saved_views::Column::Name);
        if let Some(entity_type) = entity_type {
            query = query.filter(saved_views::Column::EntityType.eq(entity_type.as_str()));
        }
        query.all(&self.db).await
    }

    /// Finds a view owned by the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<saved_views::Model>, DbErr> {
        saved_views::Entity::find_by_id(id)
            .filter(saved_views::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Creates a view, optionally as the new default.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or config is invalid or the write fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateSavedViewInput,
    ) -> Result<saved_views::Model, SavedViewRepositoryError> {
        let name = validate_view_name(&input.name)?;
        let config = ViewConfig::from_json(&input.config)?;

        let txn = self.db.begin().await?;
        if input.is_default {
            clear_default(&txn, user_id, input.entity_type).await?;
        }

        let now = chrono::Utc::now().into();
        let view = saved_views::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            entity_type: Set(input.entity_type.as_str().to_string()),
            name: Set(name),
            config: Set(config.to_json()),
            is_default: Set(input.is_default),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = view
            .insert(&txn)
            .await
            .map_err(|e| default_conflict(e, input.entity_type))?;
        txn.commit().await?;

        Ok(created)
    }

    /// Renames a view or replaces its config.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is not the user's or the input is invalid.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateSavedViewInput,
    ) -> Result<saved_views::Model, SavedViewRepositoryError> {
        let view = self
            .find_owned(id, user_id)
            .await?
            .ok_or(SavedViewRepositoryError::ViewNotFound(id))?;

        let mut active: saved_views::ActiveModel = view.into();
        if let Some(name) = input.name {
            active.name = Set(validate_view_name(&name)?);
        }
        if let Some(config) = input.config {
            active.config = Set(ViewConfig::from_json(&config)?.to_json());
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a view.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is not the user's.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), SavedViewRepositoryError> {
        let result = saved_views::Entity::delete_many()
            .filter(saved_views::Column::Id.eq(id))
            .filter(saved_views::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(SavedViewRepositoryError::ViewNotFound(id));
        }
        Ok(())
    }

    /// Makes a view the user's default for its entity type.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is not the user's or the write fails.
    pub async fn set_default(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<saved_views::Model, SavedViewRepositoryError> {
        let txn = self.db.begin().await?;

        let view = saved_views::Entity::find_by_id(id)
            .filter(saved_views::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(SavedViewRepositoryError::ViewNotFound(id))?;

        if view.is_default {
            txn.commit().await?;
            return Ok(view);
        }

        let entity_type = EntityType::parse(&view.entity_type)
            .map_err(|_| SavedViewRepositoryError::ViewNotFound(id))?;
        clear_default(&txn, user_id, entity_type).await?;

        let mut active: saved_views::ActiveModel = view.into();
        active.is_default = Set(true);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| default_conflict(e, entity_type))?;

        txn.commit().await?;
        tracing::debug!(view_id = %id, user_id = %user_id, "Default view changed");
        Ok(updated)
    }
}

fn default_conflict(err: DbErr, entity_type: EntityType) -> SavedViewRepositoryError {
    if is_unique_violation(&err) {
        tracing::warn!(%entity_type, "Concurrent default view switch rejected");
        SavedViewRepositoryError::DefaultConflict(entity_type)
    } else {
        err.into()
    }
}

async fn clear_default<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    entity_type: EntityType,
) -> Result<u64, DbErr> {
    let result = saved_views::Entity::update_many()
        .col_expr(saved_views::Column::IsDefault, Expr::value(false))
        .col_expr(saved_views::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(saved_views::Column::UserId.eq(user_id))
        .filter(saved_views::Column::EntityType.eq(entity_type.as_str()))
        .filter(saved_views::Column::IsDefault.eq(true))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
