//! Activity snapshot repository.

use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use hearth_core::analytics::{ActivityTotals, ActivityType, AnalyticsError};
use hearth_shared::AppError;

use crate::entities::activity_snapshots::{self, Column};

/// Error types for activity operations.
#[derive(Debug, thiserror::Error)]
pub enum ActivityRepositoryError {
    /// Invalid count or date range.
    #[error(transparent)]
    Invalid(#[from] AnalyticsError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ActivityRepositoryError> for AppError {
    fn from(err: ActivityRepositoryError) -> Self {
        match err {
            ActivityRepositoryError::Invalid(e) => e.into(),
            ActivityRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Activity snapshot repository.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    /// Creates a new activity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds `count` to the user's counter for a day and activity type.
    ///
    /// Runs as one `INSERT ... ON CONFLICT DO UPDATE SET count = count + EXCLUDED.count`
    /// so concurrent increments are not lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the count is not positive or the write fails.
    pub async fn record(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        activity_type: ActivityType,
        count: i32,
    ) -> Result<activity_snapshots::Model, ActivityRepositoryError> {
        if count <= 0 {
            return Err(AnalyticsError::NonPositiveCount.into());
        }

        let now = chrono::Utc::now().into();
        let row = activity_snapshots::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            snapshot_date: Set(date),
            activity_type: Set(activity_type.as_str().to_string()),
            count: Set(count),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let stored = activity_snapshots::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::UserId, Column::SnapshotDate, Column::ActivityType])
                    .value(
                        Column::Count,
                        Expr::cust("activity_snapshots.count + EXCLUDED.count"),
                    )
                    .value(Column::UpdatedAt, Expr::current_timestamp())
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        Ok(stored)
    }

    /// Lists the user's snapshots in an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or the query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<activity_snapshots::Model>, ActivityRepositoryError> {
        if to < from {
            return Err(AnalyticsError::InvalidDateRange.into());
        }
        let rows = activity_snapshots::Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SnapshotDate.between(from, to))
            .order_by_asc(Column::SnapshotDate)
            .order_by_asc(Column::ActivityType)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Sums the user's counts per activity type in an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or the query fails.
    pub async fn totals(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ActivityTotals, ActivityRepositoryError> {
        if to < from {
            return Err(AnalyticsError::InvalidDateRange.into());
        }

        let rows: Vec<(String, i64)> = activity_snapshots::Entity::find()
            .select_only()
            .column(Column::ActivityType)
            .column_as(Column::Count.sum(), "total")
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SnapshotDate.between(from, to))
            .group_by(Column::ActivityType)
            .into_tuple()
            .all(&self.db)
            .await?;

        let counts = rows.into_iter().filter_map(|(name, total)| {
            ActivityType::parse(&name)
                .inspect_err(|_| tracing::warn!(activity_type = %name, "Skipping unknown activity type"))
                .ok()
                .map(|t| (t, total))
        });

        Ok(ActivityTotals::from_counts(counts))
    }
}
