//! Household repository.
//!
//! Households are written by the seeder and read by analytics and tagging;
//! there is no public CRUD surface for them.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::{accounts, households};

/// Household repository.
#[derive(Debug, Clone)]
pub struct HouseholdRepository {
    db: DatabaseConnection,
}

impl HouseholdRepository {
    /// Creates a new household repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a household by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<households::Model>, DbErr> {
        households::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists households, optionally restricted to one advisor's book.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, advisor_id: Option<Uuid>) -> Result<Vec<households::Model>, DbErr> {
        let mut query = households::Entity::find().order_by_asc(households::Column::Name);
        if let Some(advisor_id) = advisor_id {
            query = query.filter(households::Column::AdvisorId.eq(advisor_id));
        }
        query.all(&self.db).await
    }

    /// Returns names keyed by ID for the given households.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn names_by_id(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = households::Entity::find()
            .filter(households::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|h| (h.id, h.name)).collect())
    }

    /// Creates a household with a fixed ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        id: Uuid,
        name: &str,
        advisor_id: Option<Uuid>,
        total_aum: Decimal,
    ) -> Result<households::Model, DbErr> {
        let now = chrono::Utc::now().into();
        households::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            advisor_id: Set(advisor_id),
            total_aum: Set(total_aum),
            status: Set("active".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Adds an account to a household.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_account(
        &self,
        household_id: Uuid,
        name: &str,
        account_type: &str,
        aum: Decimal,
    ) -> Result<accounts::Model, DbErr> {
        let now = chrono::Utc::now().into();
        accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(household_id),
            name: Set(name.to_string()),
            account_type: Set(account_type.to_string()),
            aum: Set(aum),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }
}
