use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduling_cell::router::scheduling_routes;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn app(server: &MockServer) -> Router {
    scheduling_routes(TestConfig::with_supabase_url(&server.uri()).to_arc())
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn booking_body(phone: &str) -> Body {
    Body::from(json!({
        "stylist_id": 1,
        "service_id": 2,
        "date": "2026-10-20",
        "time": "10:00",
        "name": "Анна",
        "phone": phone,
        "email": "anna@example.com"
    }).to_string())
}

fn post_booking(phone: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/appointments")
        .header("Content-Type", "application/json")
        .body(booking_body(phone))
        .unwrap()
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::service(2, "Женская стрижка", 60)
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/stylists"))
        .and(query_param("id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::stylist(1, "Мария")
        ])))
        .mount(server)
        .await;
}

async fn mount_day(server: &MockServer, rows: Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("stylist_id", "eq.1"))
        .and(query_param("date", "eq.2026-10-20"))
        .and(query_param("status", "in.(pending,confirmed)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

#[tokio::test]
async fn slots_exclude_existing_booking_and_resolve_legacy_duration() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_day(&server, json!([
        MockSupabaseResponses::appointment(5, 1, 2, "2026-10-20", "10:00:00", "confirmed")
    ])).await;
    // The row has no duration snapshot, so the service list is consulted.
    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::service(2, "Женская стрижка", 60)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(
            Request::builder()
                .uri("/slots?stylist_id=1&service_id=2&date=2026-10-20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["duration_minutes"], 60);
    assert_eq!(body["day_parts"]["morning"], json!(["09:00", "11:00", "11:30"]));
    assert_eq!(body["slots"].as_array().map(Vec::len), Some(20));
    assert_eq!(body["day_parts"]["evening"].as_array().and_then(|v| v.last()), Some(&json!("20:00")));
}

#[tokio::test]
async fn failed_fetch_is_unavailable_not_fully_open() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("connection reset"))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(
            Request::builder()
                .uri("/slots?stylist_id=1&service_id=2&date=2026-10-20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn booking_is_created_pending() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_day(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "time": "10:00",
            "duration_minutes": 60,
            "status": "pending"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment(12, 1, 2, "2026-10-20", "10:00:00", "pending")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server).oneshot(post_booking("+7 912 345-67-89")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["appointment"]["id"], 12);
    assert_eq!(body["appointment"]["status"], "pending");
}

#[tokio::test]
async fn unique_violation_is_conflict() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_day(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::unique_violation()))
        .mount(&server)
        .await;

    let response = app(&server).oneshot(post_booking("+7 912 345-67-89")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_phone_is_unprocessable_and_never_reaches_the_store() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server).oneshot(post_booking("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["fields"], json!(["phone"]));
}

#[tokio::test]
async fn missing_selections_are_reported_as_fields() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/appointments")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({
            "stylist_id": 1,
            "time": "10:00",
            "name": "Анна",
            "phone": "+7 912 345-67-89",
            "email": "anna@example.com"
        }).to_string()))
        .unwrap();

    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["fields"], json!(["service_id", "date"]));
}

#[tokio::test]
async fn slow_store_is_unavailable_not_slot_taken() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([]))
            .set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    config.supabase_timeout_secs = 1;
    let app = scheduling_routes(std::sync::Arc::new(config));

    let response = app.oneshot(post_booking("+7 912 345-67-89")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
