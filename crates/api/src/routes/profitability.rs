//! Household profitability routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{parse_period_type, today};
use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_core::analytics::dashboard::TOP_HOUSEHOLDS;
use hearth_core::period::PeriodType;
use hearth_core::profitability::{
    PortfolioSummary, ProfitabilityInputs, ProfitabilityMetrics, ProfitabilityService,
    ProfitabilityTier, ScoreBreakdown,
};
use hearth_db::entities::client_profitability;
use hearth_db::repositories::ProfitabilityFilter;
use hearth_db::repositories::profitability::{inputs_from_model, metrics_from_model};
use hearth_db::{HouseholdRepository, ProfitabilityRepository};

/// Largest page the list endpoint returns.
const MAX_LIMIT: u64 = 500;

/// Creates the profitability routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/profitability", get(list_profitability))
        .route("/analytics/profitability/summary", get(profitability_summary))
        .route(
            "/analytics/profitability/{household_id}",
            get(household_profitability).put(update_profitability),
        )
}

/// Query parameters for listing profitability.
#[derive(Debug, Deserialize)]
pub struct ListProfitabilityQuery {
    /// `monthly`, `quarterly` or `annual`.
    pub period_type: Option<String>,
    /// Only this tier.
    pub tier: Option<String>,
    /// Maximum rows.
    pub limit: Option<u64>,
}

/// Query parameters carrying a period type.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// `monthly`, `quarterly` or `annual`.
    pub period_type: Option<String>,
}

/// Request body for entering profitability inputs.
#[derive(Debug, Deserialize)]
pub struct UpdateProfitabilityRequest {
    /// Period granularity (default monthly).
    pub period_type: Option<String>,
    /// Any date inside the period (default today).
    pub as_of: Option<NaiveDate>,
    /// Raw inputs; derived figures are always recomputed.
    pub inputs: ProfitabilityInputs,
}

/// One stored period for a household.
#[derive(Debug, Serialize)]
pub struct ProfitabilityPeriodResponse {
    /// Row ID.
    pub id: Uuid,
    /// Period granularity.
    pub period_type: PeriodType,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Stored inputs.
    pub inputs: ProfitabilityInputs,
    /// Derived figures.
    pub metrics: ProfitabilityMetrics,
    /// Sub-scores behind `metrics.score`.
    pub breakdown: ScoreBreakdown,
}

impl From<client_profitability::Model> for ProfitabilityPeriodResponse {
    fn from(row: client_profitability::Model) -> Self {
        let metrics = metrics_from_model(&row);
        let breakdown = ProfitabilityService::score_breakdown(
            metrics.net_margin,
            metrics.revenue_per_hour,
            metrics.effective_fee_rate,
        );
        Self {
            id: row.id,
            period_type: row.period_type.into(),
            period_start: row.period_start,
            period_end: row.period_end,
            inputs: inputs_from_model(&row),
            metrics,
            breakdown,
        }
    }
}

/// GET `/analytics/profitability` - Scored households for the latest period.
async fn list_profitability(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListProfitabilityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period_type = parse_period_type(query.period_type.as_deref())?;
    let tier = match query.tier.as_deref() {
        Some(raw) => Some(
            ProfitabilityTier::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("unknown tier '{raw}'")))?,
        ),
        None => None,
    };
    let filter = ProfitabilityFilter {
        tier,
        limit: query.limit.map(|l| l.clamp(1, MAX_LIMIT)),
    };

    let repo = ProfitabilityRepository::new((*state.db).clone());
    let Some(period_start) = repo.latest_period_start(period_type).await? else {
        return Ok(Json(json!({
            "period_type": period_type,
            "period_start": null,
            "households": []
        })));
    };
    let households = repo.list_for_period(period_type, period_start, filter).await?;

    Ok(Json(json!({
        "period_type": period_type,
        "period_start": period_start,
        "households": households
    })))
}

/// GET `/analytics/profitability/summary` - Portfolio summary for the latest period.
async fn profitability_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period_type = parse_period_type(query.period_type.as_deref())?;

    let repo = ProfitabilityRepository::new((*state.db).clone());
    let period_start = repo.latest_period_start(period_type).await?;
    let rows = match period_start {
        Some(start) => {
            repo.list_for_period(period_type, start, ProfitabilityFilter::default())
                .await?
        }
        None => Vec::new(),
    };

    Ok(Json(json!({
        "period_type": period_type,
        "period_start": period_start,
        "summary": PortfolioSummary::from_rows(&rows, TOP_HOUSEHOLDS)
    })))
}

/// GET `/analytics/profitability/{household_id}` - A household's scored periods.
async fn household_profitability(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(household_id): Path<Uuid>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period_type = match query.period_type.as_deref() {
        Some(raw) => Some(parse_period_type(Some(raw))?),
        None => None,
    };

    let household = HouseholdRepository::new((*state.db).clone())
        .find_by_id(household_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Household not found: {household_id}")))?;

    let periods: Vec<ProfitabilityPeriodResponse> =
        ProfitabilityRepository::new((*state.db).clone())
            .history(household_id, period_type)
            .await?
            .into_iter()
            .map(ProfitabilityPeriodResponse::from)
            .collect();

    Ok(Json(json!({
        "household_id": household.id,
        "household_name": household.name,
        "total_aum": household.total_aum,
        "periods": periods
    })))
}

/// PUT `/analytics/profitability/{household_id}` - Store inputs and recompute.
async fn update_profitability(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(household_id): Path<Uuid>,
    Json(payload): Json<UpdateProfitabilityRequest>,
) -> Result<Json<ProfitabilityPeriodResponse>, ApiError> {
    auth.require(auth.role().can_edit_profitability(), "edit profitability")?;

    let period_type = parse_period_type(payload.period_type.as_deref())?;
    let period = period_type.bounds(payload.as_of.unwrap_or_else(today));

    let row = ProfitabilityRepository::new((*state.db).clone())
        .upsert_calculated(household_id, period, &payload.inputs, &state.cost_rates)
        .await?;

    tracing::info!(
        household_id = %household_id,
        period = %period.label(),
        score = %row.profitability_score,
        updated_by = %auth.user_id(),
        "Profitability recomputed"
    );

    Ok(Json(row.into()))
}
