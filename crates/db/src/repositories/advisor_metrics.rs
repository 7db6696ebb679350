//! Advisor metrics repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value;
use uuid::Uuid;

use hearth_core::analytics::{AdvisorSnapshot, AnalyticsError, merge_goals};
use hearth_core::period::{PeriodBounds, PeriodType as CorePeriodType};
use hearth_shared::AppError;

use crate::entities::advisor_metrics::{self, Column};
use crate::entities::sea_orm_active_enums::PeriodType;
use crate::entities::users;

/// Error types for advisor metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorMetricsRepositoryError {
    /// No metrics row for the advisor.
    #[error("No metrics found for advisor {0}")]
    NotFound(Uuid),

    /// Goals patch was malformed.
    #[error(transparent)]
    Goals(#[from] AnalyticsError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AdvisorMetricsRepositoryError> for AppError {
    fn from(err: AdvisorMetricsRepositoryError) -> Self {
        match err {
            AdvisorMetricsRepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            AdvisorMetricsRepositoryError::Goals(e) => e.into(),
            AdvisorMetricsRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Rollup figures written for one advisor and period.
#[derive(Debug, Clone, Default)]
pub struct AdvisorMetricsInput {
    /// Households served.
    pub households: i32,
    /// Total AUM.
    pub total_aum: Decimal,
    /// New AUM in the period.
    pub new_aum: Decimal,
    /// Revenue in the period.
    pub revenue: Decimal,
    /// Meetings held.
    pub meetings_held: i32,
    /// Tasks completed.
    pub tasks_completed: i32,
    /// Client retention percentage.
    pub client_retention_rate: Decimal,
}

/// Advisor metrics repository.
#[derive(Debug, Clone)]
pub struct AdvisorMetricsRepository {
    db: DatabaseConnection,
}

impl AdvisorMetricsRepository {
    /// Creates a new advisor metrics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the advisor's row for an exact period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        advisor_id: Uuid,
        period: PeriodBounds,
    ) -> Result<Option<AdvisorSnapshot>, DbErr> {
        let row = advisor_metrics::Entity::find()
            .filter(Column::AdvisorId.eq(advisor_id))
            .filter(Column::PeriodType.eq(PeriodType::from(period.period_type)))
            .filter(Column::PeriodStart.eq(period.start))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(|(m, u)| to_snapshot(m, u)))
    }

    /// Returns the advisor's rows for a period type, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(
        &self,
        advisor_id: Uuid,
        period_type: CorePeriodType,
    ) -> Result<Vec<AdvisorSnapshot>, DbErr> {
        let rows = advisor_metrics::Entity::find()
            .filter(Column::AdvisorId.eq(advisor_id))
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .order_by_desc(Column::PeriodStart)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(m, u)| to_snapshot(m, u)).collect())
    }

    /// Returns every advisor's row for one period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_period(
        &self,
        period_type: CorePeriodType,
        period_start: NaiveDate,
    ) -> Result<Vec<AdvisorSnapshot>, DbErr> {
        let rows = advisor_metrics::Entity::find()
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .filter(Column::PeriodStart.eq(period_start))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(m, u)| to_snapshot(m, u)).collect())
    }

    /// Returns the most recent period start with any advisor rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest_period_start(
        &self,
        period_type: CorePeriodType,
    ) -> Result<Option<NaiveDate>, DbErr> {
        let latest = advisor_metrics::Entity::find()
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .order_by_desc(Column::PeriodStart)
            .one(&self.db)
            .await?;
        Ok(latest.map(|row| row.period_start))
    }

    /// Inserts or replaces the rollup for an advisor and period.
    ///
    /// Existing goals and metadata are left untouched on update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(
        &self,
        advisor_id: Uuid,
        period: PeriodBounds,
        input: AdvisorMetricsInput,
    ) -> Result<advisor_metrics::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let row = advisor_metrics::ActiveModel {
            id: Set(Uuid::new_v4()),
            advisor_id: Set(advisor_id),
            period_type: Set(period.period_type.into()),
            period_start: Set(period.start),
            period_end: Set(period.end),
            households: Set(input.households),
            total_aum: Set(input.total_aum),
            new_aum: Set(input.new_aum),
            revenue: Set(input.revenue),
            meetings_held: Set(input.meetings_held),
            tasks_completed: Set(input.tasks_completed),
            client_retention_rate: Set(input.client_retention_rate),
            goals: Set(Value::Object(serde_json::Map::new())),
            metadata: Set(Value::Object(serde_json::Map::new())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        advisor_metrics::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::AdvisorId, Column::PeriodType, Column::PeriodStart])
                    .update_columns([
                        Column::PeriodEnd,
                        Column::Households,
                        Column::TotalAum,
                        Column::NewAum,
                        Column::Revenue,
                        Column::MeetingsHeld,
                        Column::TasksCompleted,
                        Column::ClientRetentionRate,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
    }

    /// Merges a goals patch into the advisor's latest row for a period type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The advisor has no metrics row for the period type
    /// - The patch is malformed
    /// - The database write fails
    pub async fn update_goals(
        &self,
        advisor_id: Uuid,
        period_type: CorePeriodType,
        patch: &Value,
    ) -> Result<advisor_metrics::Model, AdvisorMetricsRepositoryError> {
        let row = advisor_metrics::Entity::find()
            .filter(Column::AdvisorId.eq(advisor_id))
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .order_by_desc(Column::PeriodStart)
            .one(&self.db)
            .await?
            .ok_or(AdvisorMetricsRepositoryError::NotFound(advisor_id))?;

        let goals = merge_goals(&row.goals, patch)?;

        let mut active: advisor_metrics::ActiveModel = row.into();
        active.goals = Set(goals);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}

fn to_snapshot(row: advisor_metrics::Model, user: Option<users::Model>) -> AdvisorSnapshot {
    AdvisorSnapshot {
        advisor_id: row.advisor_id,
        advisor_name: user.map(|u| u.full_name).unwrap_or_default(),
        period_type: row.period_type.into(),
        period_start: row.period_start,
        households: row.households,
        total_aum: row.total_aum,
        new_aum: row.new_aum,
        revenue: row.revenue,
        meetings_held: row.meetings_held,
        tasks_completed: row.tasks_completed,
        client_retention_rate: row.client_retention_rate,
        goals: row.goals,
    }
}
