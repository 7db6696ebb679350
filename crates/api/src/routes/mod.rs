//! API route definitions.

use axum::{Router, middleware};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::{AppState, error::ApiError, middleware::auth::auth_middleware};
use hearth_core::customization::EntityType;
use hearth_core::period::PeriodType;

pub mod analytics;
pub mod auth;
pub mod fields;
pub mod health;
pub mod outlook;
pub mod preferences;
pub mod profitability;
pub mod tags;
pub mod views;
pub mod workflows;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(analytics::routes())
        .merge(profitability::routes())
        .merge(fields::routes())
        .merge(tags::routes())
        .merge(views::routes())
        .merge(preferences::routes())
        .merge(workflows::routes())
        .merge(outlook::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Parses a `period_type` query value, defaulting to monthly.
pub(crate) fn parse_period_type(raw: Option<&str>) -> Result<PeriodType, ApiError> {
    match raw {
        None => Ok(PeriodType::Monthly),
        Some(s) => PeriodType::parse(s)
            .ok_or_else(|| ApiError::bad_request(format!("unknown period_type '{s}'"))),
    }
}

/// Parses an entity type path segment.
pub(crate) fn parse_entity_type(raw: &str) -> Result<EntityType, ApiError> {
    Ok(EntityType::parse(raw)?)
}

/// Today's date in UTC.
pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
