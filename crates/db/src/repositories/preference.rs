//! User preference repository.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::user_preferences::{self, Column};

/// User preference repository.
#[derive(Debug, Clone)]
pub struct PreferenceRepository {
    db: DatabaseConnection,
}

impl PreferenceRepository {
    /// Creates a new preference repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's preferences ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<user_preferences::Model>, DbErr> {
        user_preferences::Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Key)
            .all(&self.db)
            .await
    }

    /// Gets one preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<user_preferences::Model>, DbErr> {
        user_preferences::Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Key.eq(key))
            .one(&self.db)
            .await
    }

    /// Inserts or replaces a preference with `ON CONFLICT (user_id, key) DO UPDATE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<user_preferences::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let row = user_preferences::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            key: Set(key.to_string()),
            value: Set(value),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user_preferences::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::UserId, Column::Key])
                    .update_columns([Column::Value, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
    }

    /// Deletes a preference. Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn delete(&self, user_id: Uuid, key: &str) -> Result<bool, DbErr> {
        let result = user_preferences::Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
