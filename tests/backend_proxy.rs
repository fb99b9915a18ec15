mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app_for, app_with_dead_backend, get};

#[tokio::test]
async fn healthy_backend_is_relayed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(app_for(&server), "/api/backend-proxy").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"status": "ok"}));
}

#[tokio::test]
async fn backend_error_status_becomes_generic_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "maintenance"})))
        .mount(&server)
        .await;

    let response = get(app_for(&server), "/api/backend-proxy").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"status": "error", "message": "Failed to connect to backend service"})
    );
}

#[tokio::test]
async fn unreachable_backend_becomes_generic_500() {
    let response = get(app_with_dead_backend(), "/api/backend-proxy").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["message"], "Failed to connect to backend service");
}

#[tokio::test]
async fn non_json_health_body_becomes_generic_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let response = get(app_for(&server), "/api/backend-proxy").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["status"], "error");
}

#[tokio::test]
async fn gateway_liveness_does_not_call_backend() {
    let response = get(app_with_dead_backend(), "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"OK");
}
