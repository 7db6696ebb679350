//! Firm metrics repository.

use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value;
use uuid::Uuid;

use hearth_core::analytics::FirmSnapshot;
use hearth_core::period::{PeriodBounds, PeriodType as CorePeriodType};

use crate::entities::firm_metrics::{self, Column};
use crate::entities::sea_orm_active_enums::PeriodType;

/// Firm-wide rollup figures for one period.
#[derive(Debug, Clone, Default)]
pub struct FirmMetricsInput {
    /// Total AUM.
    pub total_aum: Decimal,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Household count.
    pub total_households: i32,
    /// Advisor count.
    pub total_advisors: i32,
    /// Mean profitability score.
    pub average_profitability_score: Decimal,
    /// Net new assets.
    pub net_new_assets: Decimal,
}

/// Firm metrics repository.
#[derive(Debug, Clone)]
pub struct FirmMetricsRepository {
    db: DatabaseConnection,
}

impl FirmMetricsRepository {
    /// Creates a new firm metrics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the rollup for an exact period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, period: PeriodBounds) -> Result<Option<FirmSnapshot>, DbErr> {
        let row = firm_metrics::Entity::find()
            .filter(Column::PeriodType.eq(PeriodType::from(period.period_type)))
            .filter(Column::PeriodStart.eq(period.start))
            .one(&self.db)
            .await?;
        Ok(row.map(to_snapshot))
    }

    /// Returns the most recent rollup for a period type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest(&self, period_type: CorePeriodType) -> Result<Option<FirmSnapshot>, DbErr> {
        let row = firm_metrics::Entity::find()
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .order_by_desc(Column::PeriodStart)
            .one(&self.db)
            .await?;
        Ok(row.map(to_snapshot))
    }

    /// Returns rollups for a period type, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(&self, period_type: CorePeriodType) -> Result<Vec<FirmSnapshot>, DbErr> {
        let rows = firm_metrics::Entity::find()
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .order_by_desc(Column::PeriodStart)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_snapshot).collect())
    }

    /// Inserts or replaces the rollup for a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(
        &self,
        period: PeriodBounds,
        input: FirmMetricsInput,
    ) -> Result<firm_metrics::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let row = firm_metrics::ActiveModel {
            id: Set(Uuid::new_v4()),
            period_type: Set(period.period_type.into()),
            period_start: Set(period.start),
            period_end: Set(period.end),
            total_aum: Set(input.total_aum),
            total_revenue: Set(input.total_revenue),
            total_households: Set(input.total_households),
            total_advisors: Set(input.total_advisors),
            average_profitability_score: Set(input.average_profitability_score),
            net_new_assets: Set(input.net_new_assets),
            metadata: Set(Value::Object(serde_json::Map::new())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        firm_metrics::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::PeriodType, Column::PeriodStart])
                    .update_columns([
                        Column::PeriodEnd,
                        Column::TotalAum,
                        Column::TotalRevenue,
                        Column::TotalHouseholds,
                        Column::TotalAdvisors,
                        Column::AverageProfitabilityScore,
                        Column::NetNewAssets,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
    }
}

fn to_snapshot(row: firm_metrics::Model) -> FirmSnapshot {
    FirmSnapshot {
        period_type: row.period_type.into(),
        period_start: row.period_start,
        period_end: row.period_end,
        total_aum: row.total_aum,
        total_revenue: row.total_revenue,
        total_households: row.total_households,
        total_advisors: row.total_advisors,
        average_profitability_score: row.average_profitability_score,
        net_new_assets: row.net_new_assets,
    }
}
