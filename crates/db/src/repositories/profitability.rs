//! Client profitability repository.
//!
//! `upsert_calculated` is the only write path: derived columns are always
//! recomputed from the inputs by `ProfitabilityService` before storage, and
//! the inputs are stored at the same scale the scorer used.

use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use hearth_core::period::{PeriodBounds, PeriodType as CorePeriodType};
use hearth_core::profitability::{
    CostRates, ProfitabilityError, ProfitabilityInputs, ProfitabilityMetrics, ProfitabilityService,
    ProfitabilityTier as CoreTier, ScoredHousehold,
};
use hearth_shared::AppError;

use crate::entities::client_profitability::{self, Column};
use crate::entities::households;
use crate::entities::sea_orm_active_enums::{PeriodType, ProfitabilityTier};

/// Error types for profitability operations.
#[derive(Debug, thiserror::Error)]
pub enum ProfitabilityRepositoryError {
    /// Household does not exist.
    #[error("Household not found: {0}")]
    HouseholdNotFound(Uuid),

    /// Inputs failed validation.
    #[error(transparent)]
    Calculation(#[from] ProfitabilityError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProfitabilityRepositoryError> for AppError {
    fn from(err: ProfitabilityRepositoryError) -> Self {
        match err {
            ProfitabilityRepositoryError::HouseholdNotFound(_) => Self::NotFound(err.to_string()),
            ProfitabilityRepositoryError::Calculation(e) => e.into(),
            ProfitabilityRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter options for listing scored households.
#[derive(Debug, Clone, Default)]
pub struct ProfitabilityFilter {
    /// Only rows in this tier.
    pub tier: Option<CoreTier>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
}

/// Client profitability repository.
#[derive(Debug, Clone)]
pub struct ProfitabilityRepository {
    db: DatabaseConnection,
}

impl ProfitabilityRepository {
    /// Creates a new profitability repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Scores the inputs and stores inputs plus derived figures for the period.
    ///
    /// Inserts or replaces the row keyed by (household, period type, period start).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The household does not exist
    /// - An input or rate is negative, or an input or derived total exceeds
    ///   its column precision
    /// - The database write fails
    pub async fn upsert_calculated(
        &self,
        household_id: Uuid,
        period: PeriodBounds,
        inputs: &ProfitabilityInputs,
        rates: &CostRates,
    ) -> Result<client_profitability::Model, ProfitabilityRepositoryError> {
        let inputs = inputs.normalized();
        let metrics = ProfitabilityService::calculate(&inputs, rates)?;

        households::Entity::find_by_id(household_id)
            .one(&self.db)
            .await?
            .ok_or(ProfitabilityRepositoryError::HouseholdNotFound(household_id))?;

        let now = chrono::Utc::now().into();
        let row = client_profitability::ActiveModel {
            id: Set(Uuid::new_v4()),
            household_id: Set(household_id),
            period_type: Set(period.period_type.into()),
            period_start: Set(period.start),
            period_end: Set(period.end),
            aum: Set(inputs.aum),
            management_fee_revenue: Set(inputs.management_fee_revenue),
            planning_fee_revenue: Set(inputs.planning_fee_revenue),
            other_revenue: Set(inputs.other_revenue),
            advisor_hours: Set(inputs.advisor_hours),
            operations_hours: Set(inputs.operations_hours),
            compliance_hours: Set(inputs.compliance_hours),
            technology_cost: Set(inputs.technology_cost),
            custodian_cost: Set(inputs.custodian_cost),
            marketing_cost: Set(inputs.marketing_cost),
            overhead_cost: Set(inputs.overhead_cost),
            total_revenue: Set(metrics.total_revenue),
            direct_labor_cost: Set(metrics.direct_labor_cost),
            total_cost: Set(metrics.total_cost),
            gross_profit: Set(metrics.gross_profit),
            net_profit: Set(metrics.net_profit),
            gross_margin: Set(metrics.gross_margin),
            net_margin: Set(metrics.net_margin),
            total_hours: Set(metrics.total_hours),
            revenue_per_hour: Set(metrics.revenue_per_hour),
            profit_per_hour: Set(metrics.profit_per_hour),
            effective_fee_rate: Set(metrics.effective_fee_rate),
            profitability_score: Set(metrics.score),
            tier: Set(metrics.tier.into()),
            calculated_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let on_conflict = OnConflict::columns([
            Column::HouseholdId,
            Column::PeriodType,
            Column::PeriodStart,
        ])
        .update_columns([
            Column::PeriodEnd,
            Column::Aum,
            Column::ManagementFeeRevenue,
            Column::PlanningFeeRevenue,
            Column::OtherRevenue,
            Column::AdvisorHours,
            Column::OperationsHours,
            Column::ComplianceHours,
            Column::TechnologyCost,
            Column::CustodianCost,
            Column::MarketingCost,
            Column::OverheadCost,
            Column::TotalRevenue,
            Column::DirectLaborCost,
            Column::TotalCost,
            Column::GrossProfit,
            Column::NetProfit,
            Column::GrossMargin,
            Column::NetMargin,
            Column::TotalHours,
            Column::RevenuePerHour,
            Column::ProfitPerHour,
            Column::EffectiveFeeRate,
            Column::ProfitabilityScore,
            Column::Tier,
            Column::CalculatedAt,
        ])
        .to_owned();

        let stored = client_profitability::Entity::insert(row)
            .on_conflict(on_conflict)
            .exec_with_returning(&self.db)
            .await?;

        tracing::debug!(
            household_id = %household_id,
            period = %period.label(),
            score = %stored.profitability_score,
            "Profitability recalculated"
        );

        Ok(stored)
    }

    /// Returns a household's rows, newest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(
        &self,
        household_id: Uuid,
        period_type: Option<CorePeriodType>,
    ) -> Result<Vec<client_profitability::Model>, DbErr> {
        let mut query = client_profitability::Entity::find()
            .filter(Column::HouseholdId.eq(household_id))
            .order_by_desc(Column::PeriodStart);
        if let Some(period_type) = period_type {
            query = query.filter(Column::PeriodType.eq(PeriodType::from(period_type)));
        }
        query.all(&self.db).await
    }

    /// Returns the most recent period start that has any scored rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest_period_start(
        &self,
        period_type: CorePeriodType,
    ) -> Result<Option<NaiveDate>, DbErr> {
        let latest = client_profitability::Entity::find()
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .order_by_desc(Column::PeriodStart)
            .one(&self.db)
            .await?;
        Ok(latest.map(|row| row.period_start))
    }

    /// Lists scored households for one period, best score first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_period(
        &self,
        period_type: CorePeriodType,
        period_start: NaiveDate,
        filter: ProfitabilityFilter,
    ) -> Result<Vec<ScoredHousehold>, DbErr> {
        let mut query = client_profitability::Entity::find()
            .filter(Column::PeriodType.eq(PeriodType::from(period_type)))
            .filter(Column::PeriodStart.eq(period_start))
            .order_by_desc(Column::ProfitabilityScore)
            .order_by_asc(Column::HouseholdId);

        if let Some(tier) = filter.tier {
            query = query.filter(Column::Tier.eq(ProfitabilityTier::from(tier)));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query
            .find_also_related(households::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(row, household)| ScoredHousehold {
                household_id: row.household_id,
                household_name: household.map(|h| h.name).unwrap_or_default(),
                metrics: metrics_from_model(&row),
            })
            .collect())
    }
}

/// Reads stored inputs back from a row.
#[must_use]
pub fn inputs_from_model(row: &client_profitability::Model) -> ProfitabilityInputs {
    ProfitabilityInputs {
        aum: row.aum,
        management_fee_revenue: row.management_fee_revenue,
        planning_fee_revenue: row.planning_fee_revenue,
        other_revenue: row.other_revenue,
        advisor_hours: row.advisor_hours,
        operations_hours: row.operations_hours,
        compliance_hours: row.compliance_hours,
        technology_cost: row.technology_cost,
        custodian_cost: row.custodian_cost,
        marketing_cost: row.marketing_cost,
        overhead_cost: row.overhead_cost,
    }
}

/// Reads stored derived figures back from a row.
#[must_use]
pub fn metrics_from_model(row: &client_profitability::Model) -> ProfitabilityMetrics {
    ProfitabilityMetrics {
        total_revenue: row.total_revenue,
        direct_labor_cost: row.direct_labor_cost,
        total_cost: row.total_cost,
        gross_profit: row.gross_profit,
        net_profit: row.net_profit,
        gross_margin: row.gross_margin,
        net_margin: row.net_margin,
        total_hours: row.total_hours,
        revenue_per_hour: row.revenue_per_hour,
        profit_per_hour: row.profit_per_hour,
        effective_fee_rate: row.effective_fee_rate,
        score: row.profitability_score,
        tier: row.tier.into(),
    }
}
