//! Advisor, firm, and activity analytics routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use super::{parse_period_type, today};
use crate::{AppState, error::ApiError, middleware::AuthUser};
use hearth_core::analytics::{
    ActivityType, AdvisorMetric, AdvisorSnapshot, DashboardSummary, FirmSnapshot, GoalProgress,
    goal_progress, merge_goals, percentile_ranks,
};
use hearth_core::auth::UserRole;
use hearth_core::period::PeriodType;
use hearth_db::repositories::ProfitabilityFilter;
use hearth_db::{
    ActivityRepository, AdvisorMetricsRepository, FirmMetricsRepository, ProfitabilityRepository,
};

/// Trailing window for activity totals.
const ACTIVITY_WINDOW_DAYS: i64 = 30;

/// Creates the analytics routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/dashboard", get(dashboard))
        .route("/analytics/advisors/rankings", get(advisor_rankings))
        .route("/analytics/advisors/{advisor_id}/metrics", get(advisor_metrics))
        .route("/analytics/firm", get(firm_metrics))
        .route("/analytics/goals", patch(update_goals))
        .route("/analytics/activity", get(list_activity).post(record_activity))
}

/// Query parameters carrying a period type.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// `monthly`, `quarterly` or `annual`.
    pub period_type: Option<String>,
}

/// Query parameters for advisor rankings.
#[derive(Debug, Deserialize)]
pub struct RankingsQuery {
    /// `monthly`, `quarterly` or `annual`.
    pub period_type: Option<String>,
    /// Metric to rank on (default `revenue`).
    pub metric: Option<String>,
}

/// Query parameters for activity listing.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// First day (inclusive).
    pub from: Option<NaiveDate>,
    /// Last day (inclusive).
    pub to: Option<NaiveDate>,
}

/// Request body for updating goals.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalsRequest {
    /// Advisor whose goals change; defaults to the caller.
    pub advisor_id: Option<Uuid>,
    /// Period type of the metrics row.
    pub period_type: Option<String>,
    /// Metric key to target; `null` removes a goal.
    pub goals: Value,
}

/// Request body for recording activity.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordActivityRequest {
    /// Activity type, e.g. `call` or `meeting`.
    pub activity_type: String,
    /// Increment (default 1).
    #[validate(range(min = 1, max = 1000))]
    pub count: Option<i32>,
    /// Day to record against (default today).
    pub date: Option<NaiveDate>,
}

/// One advisor's position in a ranking.
#[derive(Debug, Serialize)]
pub struct RankingEntry {
    /// Advisor ID.
    pub advisor_id: Uuid,
    /// Advisor name.
    pub advisor_name: String,
    /// Metric value.
    pub value: rust_decimal::Decimal,
    /// 1-based rank, ties share.
    pub rank: u32,
    /// Percentile, 0-100.
    pub percentile: rust_decimal::Decimal,
}

/// Advisor metrics response.
#[derive(Debug, Serialize)]
pub struct AdvisorMetricsResponse {
    /// Advisor ID.
    pub advisor_id: Uuid,
    /// Period type.
    pub period_type: PeriodType,
    /// Most recent period.
    pub current: Option<AdvisorSnapshot>,
    /// Goal progress for the most recent period.
    pub goals: Vec<GoalProgress>,
    /// All periods, newest first.
    pub history: Vec<AdvisorSnapshot>,
}

/// GET `/analytics/dashboard` - Dashboard for the caller.
async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let period_type = parse_period_type(query.period_type.as_deref())?;
    let today = today();
    let period = period_type.bounds(today);

    let firm_repo = FirmMetricsRepository::new((*state.db).clone());
    let firm = match firm_repo.find(period).await? {
        Some(snapshot) => Some(snapshot),
        None => firm_repo.latest(period_type).await?,
    };

    let advisor = AdvisorMetricsRepository::new((*state.db).clone())
        .history(auth.user_id(), period_type)
        .await?
        .into_iter()
        .next();

    let profitability_repo = ProfitabilityRepository::new((*state.db).clone());
    let scored = match profitability_repo.latest_period_start(period_type).await? {
        Some(start) => {
            profitability_repo
                .list_for_period(period_type, start, ProfitabilityFilter::default())
                .await?
        }
        None => Vec::new(),
    };

    let activity = ActivityRepository::new((*state.db).clone())
        .totals(
            auth.user_id(),
            today - Duration::days(ACTIVITY_WINDOW_DAYS - 1),
            today,
        )
        .await?;

    Ok(Json(DashboardSummary::assemble(
        period, firm, advisor, &scored, activity,
    )))
}

/// GET `/analytics/advisors/{advisor_id}/metrics` - Advisor history and goals.
async fn advisor_metrics(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(advisor_id): Path<Uuid>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<AdvisorMetricsResponse>, ApiError> {
    let period_type = parse_period_type(query.period_type.as_deref())?;

    let history = AdvisorMetricsRepository::new((*state.db).clone())
        .history(advisor_id, period_type)
        .await?;
    let current = history.first().cloned();
    let goals = current
        .as_ref()
        .map(|s| goal_progress(&s.goals, &s.actuals()))
        .unwrap_or_default();

    Ok(Json(AdvisorMetricsResponse {
        advisor_id,
        period_type,
        current,
        goals,
        history,
    }))
}

/// GET `/analytics/advisors/rankings` - Percentile ranking for the latest period.
async fn advisor_rankings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RankingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_view_rankings(), "view advisor rankings")?;

    let period_type = parse_period_type(query.period_type.as_deref())?;
    let metric = match query.metric.as_deref() {
        Some(raw) => AdvisorMetric::parse(raw)?,
        None => AdvisorMetric::Revenue,
    };

    let repo = AdvisorMetricsRepository::new((*state.db).clone());
    let Some(period_start) = repo.latest_period_start(period_type).await? else {
        return Ok(Json(json!({
            "period_type": period_type,
            "metric": metric,
            "period_start": null,
            "rankings": []
        })));
    };

    let snapshots = repo.list_for_period(period_type, period_start).await?;
    let values: Vec<(Uuid, rust_decimal::Decimal)> = snapshots
        .iter()
        .map(|s| (s.advisor_id, s.metric_value(metric)))
        .collect();

    let rankings: Vec<RankingEntry> = percentile_ranks(&values)
        .into_iter()
        .map(|r| RankingEntry {
            advisor_name: snapshots
                .iter()
                .find(|s| s.advisor_id == r.key)
                .map(|s| s.advisor_name.clone())
                .unwrap_or_default(),
            advisor_id: r.key,
            value: r.value,
            rank: r.rank,
            percentile: r.percentile,
        })
        .collect();

    Ok(Json(json!({
        "period_type": period_type,
        "metric": metric,
        "period_start": period_start,
        "rankings": rankings
    })))
}

/// GET `/analytics/firm` - Firm-wide metrics.
async fn firm_metrics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_view_firm_metrics(), "view firm metrics")?;

    let period_type = parse_period_type(query.period_type.as_deref())?;
    let history: Vec<FirmSnapshot> = FirmMetricsRepository::new((*state.db).clone())
        .history(period_type)
        .await?;
    let current = history.first();

    Ok(Json(json!({
        "period_type": period_type,
        "current": current,
        "aum_per_advisor": current.map(FirmSnapshot::aum_per_advisor),
        "revenue_per_household": current.map(FirmSnapshot::revenue_per_household),
        "history": history
    })))
}

/// PATCH `/analytics/goals` - Merge goal targets into an advisor's latest metrics row.
async fn update_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateGoalsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(auth.role().can_set_goals(), "set goals")?;

    let advisor_id = payload.advisor_id.unwrap_or_else(|| auth.user_id());
    if auth.role() == UserRole::Advisor && advisor_id != auth.user_id() {
        return Err(ApiError::forbidden("advisors can only set their own goals"));
    }

    let period_type = parse_period_type(payload.period_type.as_deref())?;
    merge_goals(&Value::Null, &payload.goals)?;
    let row = AdvisorMetricsRepository::new((*state.db).clone())
        .update_goals(advisor_id, period_type, &payload.goals)
        .await?;

    tracing::info!(
        advisor_id = %advisor_id,
        updated_by = %auth.user_id(),
        "Advisor goals updated"
    );

    Ok(Json(json!({
        "advisor_id": advisor_id,
        "period_type": period_type,
        "period_start": row.period_start,
        "goals": row.goals
    })))
}

/// GET `/analytics/activity` - Caller's activity snapshots and totals.
async fn list_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let to = query.to.unwrap_or_else(today);
    let from = query
        .from
        .unwrap_or_else(|| to - Duration::days(ACTIVITY_WINDOW_DAYS - 1));

    let repo = ActivityRepository::new((*state.db).clone());
    let totals = repo.totals(auth.user_id(), from, to).await?;
    let snapshots = repo.list(auth.user_id(), from, to).await?;

    Ok(Json(json!({
        "from": from,
        "to": to,
        "totals": totals,
        "snapshots": snapshots
    })))
}

/// POST `/analytics/activity` - Increment one of the caller's activity counters.
async fn record_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let activity_type = ActivityType::parse(&payload.activity_type)?;

    let snapshot = ActivityRepository::new((*state.db).clone())
        .record(
            auth.user_id(),
            payload.date.unwrap_or_else(today),
            activity_type,
            payload.count.unwrap_or(1),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}
