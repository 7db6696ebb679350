//! Router-level tests that never reach the database.
//!
//! The state carries a disconnected `DatabaseConnection`, so every request
//! here must be answered by auth, role guards, or input validation.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use hearth_api::{AppState, create_router};
use hearth_core::profitability::CostRates;
use hearth_shared::{JwtConfig, JwtService};

fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::new(JwtConfig {
        secret: "test-secret-for-router-tests".to_string(),
        access_token_expires_minutes: 15,
    }))
}

fn app() -> Router {
    create_router(AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        jwt_service: jwt(),
        cost_rates: CostRates::default(),
    })
}

fn token(role: &str) -> String {
    jwt().generate_access_token(Uuid::new_v4(), role).unwrap()
}

fn request(method: &str, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(role)));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(request("GET", "/api/v1/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let (status, body) = send(request("GET", "/api/v1/health/ready", None, None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(request("GET", "/api/v1/analytics/dashboard", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let req = Request::builder()
        .uri("/api/v1/customization/tags")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_is_unauthorized() {
    let (status, _) = send(request(
        "GET",
        "/api/v1/customization/tags",
        Some("superuser"),
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::viewer_creates_field("POST", "/api/v1/customization/fields", "viewer")]
#[case::advisor_creates_field("POST", "/api/v1/customization/fields", "advisor")]
#[case::compliance_creates_tag("POST", "/api/v1/customization/tags", "compliance")]
#[case::viewer_views_firm("GET", "/api/v1/analytics/firm", "viewer")]
#[case::operations_views_rankings("GET", "/api/v1/analytics/advisors/rankings", "operations")]
#[case::viewer_edits_profitability("PUT", "/api/v1/analytics/profitability/00000000-0000-0000-0000-000000000001", "viewer")]
#[case::advisor_creates_template("POST", "/api/v1/workflows/templates", "advisor")]
#[case::viewer_starts_instance("POST", "/api/v1/workflows/instances", "viewer")]
#[case::viewer_syncs_outlook("POST", "/api/v1/outlook/items", "viewer")]
#[tokio::test]
async fn test_role_guards(#[case] method: &str, #[case] uri: &str, #[case] role: &str) {
    let body = match uri {
        u if u.ends_with("/fields") => json!({
            "entity_type": "household",
            "field_key": "risk_score",
            "label": "Risk score",
            "field_type": "number"
        }),
        u if u.ends_with("/tags") => json!({ "name": "VIP" }),
        u if u.contains("/profitability/") => json!({ "inputs": {
            "aum": "0", "management_fee_revenue": "0", "planning_fee_revenue": "0",
            "other_revenue": "0", "advisor_hours": "0", "operations_hours": "0",
            "compliance_hours": "0", "technology_cost": "0", "custodian_cost": "0",
            "marketing_cost": "0", "overhead_cost": "0"
        }}),
        u if u.ends_with("/templates") => json!({
            "name": "Onboarding",
            "entity_type": "household",
            "steps": [{ "key": "kyc", "name": "KYC" }]
        }),
        u if u.ends_with("/instances") => json!({
            "template_id": Uuid::new_v4(),
            "entity_id": Uuid::new_v4()
        }),
        u if u.ends_with("/items") => json!({
            "kind": "email",
            "external_id": "AAMk-1",
            "subject": "Quarterly review",
            "occurred_at": "2026-04-02T15:00:00Z"
        }),
        _ => Value::Null,
    };
    let body = if method == "GET" { None } else { Some(body) };

    let (status, response) = send(request(method, uri, Some(role), body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_advisor_cannot_set_another_advisors_goals() {
    let (status, _) = send(request(
        "PATCH",
        "/api/v1/analytics/goals",
        Some("advisor"),
        Some(json!({ "advisor_id": Uuid::new_v4(), "goals": { "revenue": 500000 } })),
    ))
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case::zero_activity_count(
    "POST",
    "/api/v1/analytics/activity",
    Some(json!({ "activity_type": "call", "count": 0 }))
)]
#[case::unknown_activity_type(
    "POST",
    "/api/v1/analytics/activity",
    Some(json!({ "activity_type": "lunch" }))
)]
#[case::unknown_period_type("GET", "/api/v1/analytics/profitability?period_type=weekly", None)]
#[case::unknown_tier("GET", "/api/v1/analytics/profitability?tier=diamond", None)]
#[case::unknown_metric("GET", "/api/v1/analytics/advisors/rankings?metric=golf", None)]
#[case::unknown_entity_type(
    "GET",
    "/api/v1/customization/tags/entity/portfolio/00000000-0000-0000-0000-000000000001",
    None
)]
#[case::bad_preference_key("PUT", "/api/v1/customization/preferences/bad%20key", Some(json!({ "value": 1 })))]
#[case::sub_cent_goal_target(
    "PATCH",
    "/api/v1/analytics/goals",
    Some(json!({ "goals": { "revenue": "0.0000000000000000000000001" } }))
)]
#[case::profitability_hours_out_of_range(
    "PUT",
    "/api/v1/analytics/profitability/00000000-0000-0000-0000-000000000001",
    Some(json!({ "inputs": {
        "aum": "0", "management_fee_revenue": "1000", "planning_fee_revenue": "0",
        "other_revenue": "0", "advisor_hours": "79000000000000000000000000000",
        "operations_hours": "0", "compliance_hours": "0", "technology_cost": "0",
        "custodian_cost": "0", "marketing_cost": "0", "overhead_cost": "0"
    }}))
)]
#[case::bad_login_email("POST", "/api/v1/auth/login", Some(json!({ "email": "nobody", "password": "x" })))]
#[tokio::test]
async fn test_invalid_input_rejected_before_database(
    #[case] method: &str,
    #[case] uri: &str,
    #[case] body: Option<Value>,
) {
    let (status, response) = send(request(method, uri, Some("advisor"), body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "VALIDATION_ERROR");
}
