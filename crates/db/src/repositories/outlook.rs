//! Outlook item repository.
//!
//! Items arrive from the mail/calendar sync keyed by `(kind, external_id)`;
//! re-syncing an item refreshes its subject and timing but keeps any
//! household tag an advisor already applied.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use hearth_shared::AppError;

use crate::entities::{households, outlook_items, sea_orm_active_enums::OutlookItemKind};

/// Error types for Outlook item operations.
#[derive(Debug, thiserror::Error)]
pub enum OutlookRepositoryError {
    /// Item not found.
    #[error("Outlook item not found: {0}")]
    ItemNotFound(Uuid),

    /// Household not found.
    #[error("Household not found: {0}")]
    HouseholdNotFound(Uuid),

    /// Missing external id or subject.
    #[error("Invalid Outlook item: {0}")]
    Invalid(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OutlookRepositoryError> for AppError {
    fn from(err: OutlookRepositoryError) -> Self {
        match err {
            OutlookRepositoryError::ItemNotFound(_)
            | OutlookRepositoryError::HouseholdNotFound(_) => Self::NotFound(err.to_string()),
            OutlookRepositoryError::Invalid(msg) => Self::Validation(msg),
            OutlookRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A synced email or calendar event.
#[derive(Debug, Clone)]
pub struct SyncOutlookItemInput {
    /// Email or event.
    pub kind: OutlookItemKind,
    /// Identifier assigned by Outlook.
    pub external_id: String,
    /// Subject line or event title.
    pub subject: String,
    /// Sender or organizer.
    pub participant: Option<String>,
    /// Sent/received time or event start.
    pub occurred_at: DateTime<Utc>,
    /// Household to tag on first sync.
    pub household_id: Option<Uuid>,
}

/// Filter for listing Outlook items.
#[derive(Debug, Clone, Default)]
pub struct OutlookItemFilter {
    /// Restrict to one kind.
    pub kind: Option<OutlookItemKind>,
    /// Restrict to one household.
    pub household_id: Option<Uuid>,
    /// Only items with no household.
    pub untagged: bool,
    /// Maximum rows.
    pub limit: Option<u64>,
}

/// Outlook item repository.
#[derive(Debug, Clone)]
pub struct OutlookRepository {
    db: DatabaseConnection,
}

impl OutlookRepository {
    /// Creates a new Outlook repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts or refreshes a synced item.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, the household is unknown, or the
    /// write fails.
    pub async fn upsert_item(
        &self,
        synced_by: Uuid,
        input: SyncOutlookItemInput,
    ) -> Result<outlook_items::Model, OutlookRepositoryError> {
        let external_id = input.external_id.trim();
        if external_id.is_empty() {
            return Err(OutlookRepositoryError::Invalid(
                "external_id must not be empty".to_string(),
            ));
        }
        let subject = input.subject.trim();
        if subject.is_empty() {
            return Err(OutlookRepositoryError::Invalid(
                "subject must not be empty".to_string(),
            ));
        }
        if let Some(household_id) = input.household_id {
            self.ensure_household(household_id).await?;
        }

        let now = Utc::now().into();
        let item = outlook_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(input.kind),
            external_id: Set(external_id.to_string()),
            subject: Set(subject.to_string()),
            participant: Set(input.participant),
            occurred_at: Set(input.occurred_at.into()),
            household_id: Set(input.household_id),
            tagged_by: Set(input.household_id.map(|_| synced_by)),
            synced_by: Set(Some(synced_by)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = outlook_items::Entity::insert(item)
            .on_conflict(
                OnConflict::columns([outlook_items::Column::Kind, outlook_items::Column::ExternalId])
                    .update_columns([
                        outlook_items::Column::Subject,
                        outlook_items::Column::Participant,
                        outlook_items::Column::OccurredAt,
                        outlook_items::Column::SyncedBy,
                        outlook_items::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        tracing::debug!(item_id = %saved.id, kind = ?saved.kind, "Outlook item synced");
        Ok(saved)
    }

    /// Lists items, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &OutlookItemFilter,
    ) -> Result<Vec<outlook_items::Model>, DbErr> {
        let mut query =
            outlook_items::Entity::find().order_by_desc(outlook_items::Column::OccurredAt);
        if let Some(kind) = filter.kind {
            query = query.filter(outlook_items::Column::Kind.eq(kind));
        }
        if let Some(household_id) = filter.household_id {
            query = query.filter(outlook_items::Column::HouseholdId.eq(household_id));
        } else if filter.untagged {
            query = query.filter(outlook_items::Column::HouseholdId.is_null());
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        query.all(&self.db).await
    }

    /// Finds an item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, id: Uuid) -> Result<Option<outlook_items::Model>, DbErr> {
        outlook_items::Entity::find_by_id(id).one(&self.db).await
    }

    /// Tags an item to a household, replacing any previous tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the item or household does not exist.
    pub async fn set_household(
        &self,
        id: Uuid,
        household_id: Uuid,
        tagged_by: Uuid,
    ) -> Result<outlook_items::Model, OutlookRepositoryError> {
        let item = self
            .find(id)
            .await?
            .ok_or(OutlookRepositoryError::ItemNotFound(id))?;
        self.ensure_household(household_id).await?;

        let mut active: outlook_items::ActiveModel = item.into();
        active.household_id = Set(Some(household_id));
        active.tagged_by = Set(Some(tagged_by));
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        tracing::info!(item_id = %id, household_id = %household_id, "Outlook item tagged");
        Ok(updated)
    }

    /// Removes an item's household tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist.
    pub async fn clear_household(
        &self,
        id: Uuid,
    ) -> Result<outlook_items::Model, OutlookRepositoryError> {
        let item = self
            .find(id)
            .await?
            .ok_or(OutlookRepositoryError::ItemNotFound(id))?;

        let mut active: outlook_items::ActiveModel = item.into();
        active.household_id = Set(None);
        active.tagged_by = Set(None);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    async fn ensure_household(&self, household_id: Uuid) -> Result<(), OutlookRepositoryError> {
        let exists = households::Entity::find_by_id(household_id)
            .count(&self.db)
            .await?
            > 0;
        if exists {
            Ok(())
        } else {
            Err(OutlookRepositoryError::HouseholdNotFound(household_id))
        }
    }
}
