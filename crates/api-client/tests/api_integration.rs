//! Integration tests for the backend API client
//!
//! These tests use wiremock to stand in for the backend and exercise the full
//! request/response cycle, session cookie handling, and error mapping.

use api_client::{
    ApiClient, ApiClientConfig, ApiError, ApiRequest, ApiResponse, PreferencesUpdate, ThemeMode,
};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiClientConfig::new(server.uri())).unwrap()
}

fn auth_body() -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "user": {
            "id": 1,
            "telegram_id": 424242,
            "first_name": "Alice",
            "username": "alice"
        }
    })
}

// =============================================================================
// Successful Request Tests
// =============================================================================

#[tokio::test]
async fn test_get_preferences_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "theme_mode": "mixed",
            "reduced_motion": true
        })))
        .mount(&mock_server)
        .await;

    let prefs = client_for(&mock_server).preferences().await.unwrap();

    assert_eq!(prefs.theme_mode, ThemeMode::Mixed);
    assert!(prefs.reduced_motion);
}

#[tokio::test]
async fn test_update_preferences_sends_partial_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/preferences"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "theme_mode": "native" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "theme_mode": "native",
            "reduced_motion": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let prefs = client_for(&mock_server)
        .update_preferences(&PreferencesUpdate::theme_mode(ThemeMode::Native))
        .await
        .unwrap();

    assert_eq!(prefs.theme_mode, ThemeMode::Native);
    assert!(!prefs.reduced_motion);
}

#[tokio::test]
async fn test_validate_init_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/validate"))
        .and(body_json(serde_json::json!({ "initData": "query_id=AAE&hash=abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = client_for(&mock_server)
        .validate_init_data("query_id=AAE&hash=abc")
        .await
        .unwrap();

    assert!(auth.success);
    assert_eq!(auth.user.first_name, "Alice");
    assert_eq!(auth.user.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_session_cookie_is_sent_after_validation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/validate"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=signed-token; Path=/; HttpOnly")
                .set_body_json(auth_body()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/preferences"))
        .and(header("cookie", "session=signed-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "theme_mode": "native",
            "reduced_motion": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.validate_init_data("query_id=AAE&hash=abc").await.unwrap();
    let prefs = client.preferences().await.unwrap();

    assert_eq!(prefs.theme_mode, ThemeMode::Native);
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .and(header("x-client", "mini-app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ApiClientConfig::new(mock_server.uri()).with_header("X-Client", "mini-app");
    let health = ApiClient::new(config).unwrap().health().await.unwrap();

    assert!(health.is_healthy());
    assert_eq!(health.database.as_deref(), Some("connected"));
}

#[tokio::test]
async fn test_execute_generic_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/preferences"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-1")
                .set_body_json(serde_json::json!({ "theme_mode": "premium" })),
        )
        .mount(&mock_server)
        .await;

    let response: ApiResponse<api_client::Preferences> = client_for(&mock_server)
        .execute(ApiRequest::get("/api/preferences"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.headers.get("x-request-id").map(String::as_str), Some("req-1"));
    assert_eq!(response.data.theme_mode, ThemeMode::Premium);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_401_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/preferences"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "detail": "Not authenticated" })),
        )
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server).preferences().await.unwrap_err();

    assert!(error.is_unauthorized());
    match error {
        ApiError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Not authenticated");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_failure_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/validate"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "detail": "Invalid initData signature" })),
        )
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server).validate_init_data("tampered").await.unwrap_err();

    assert_eq!(error.status(), Some(401));
    assert!(error.to_string().contains("Invalid initData signature"));
}

#[tokio::test]
async fn test_500_without_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/preferences"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream crashed"))
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server)
        .update_preferences(&PreferencesUpdate::theme_mode(ThemeMode::Mixed))
        .await
        .unwrap_err();

    match error {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "HTTP 500");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_theme_mode_is_a_protocol_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "theme_mode": "holographic",
            "reduced_motion": false
        })))
        .mount(&mock_server)
        .await;

    let error = client_for(&mock_server).preferences().await.unwrap_err();

    assert!(matches!(error, ApiError::Json(_)));
}

#[tokio::test]
async fn test_unhealthy_backend_still_decodes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "status": "unhealthy",
            "error": "connection pool exhausted"
        })))
        .mount(&mock_server)
        .await;

    let health = client_for(&mock_server).health().await.unwrap();

    assert!(!health.is_healthy());
    assert_eq!(health.error.as_deref(), Some("connection pool exhausted"));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/preferences"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(serde_json::json!({ "theme_mode": "native" })),
        )
        .mount(&mock_server)
        .await;

    let config = ApiClientConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(100));
    let error = ApiClient::new(config).unwrap().preferences().await.unwrap_err();

    assert!(matches!(error, ApiError::Network(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let config = ApiClientConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
    let error = ApiClient::new(config).unwrap().preferences().await.unwrap_err();

    assert!(matches!(error, ApiError::Network(_)));
}
