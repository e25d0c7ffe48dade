//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each gateway endpoint, with the
//! coordinator running in the same in-process group.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cluster_cache::{
    api::create_router, AppState, Coordinator, CoordinatorConfig, GatewayConfig, HostProcess,
    LocalGroup,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_app_with(CoordinatorConfig::default())
}

fn create_app_with(config: CoordinatorConfig) -> Router {
    let group = LocalGroup::new();
    let primary = HostProcess::new(group.coordinator());
    let coordinator = Coordinator::init(&primary, config).unwrap();
    let gateway = Arc::new(HostProcess::new(group.spawn_worker()));
    create_router(AppState::new(gateway, coordinator, GatewayConfig::default()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let (status, json) = send(&app, "PUT", "/ns/users/42", Some(r#"{"value":{"name":"Ada"}}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["namespace"], "users");
    assert_eq!(json["key"], "42");
    assert!(json["message"].as_str().unwrap().contains("42"));
}

#[tokio::test]
async fn test_set_endpoint_rejected_by_store() {
    let app = create_app_with(CoordinatorConfig {
        max_entries: None,
        max_size: Some(16),
        default_ttl_ms: None,
        purge_interval_secs: 1,
    });

    let big = format!(r#"{{"value":"{}"}}"#, "x".repeat(64));
    let (status, json) = send(&app, "PUT", "/ns/blobs/big", Some(&big)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("blobs:big"));
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/ns/users/42", Some("not valid json")).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_overlong_key_request() {
    let app = create_test_app();

    let uri = format!("/ns/users/{}", "k".repeat(300));
    let (status, json) = send(&app, "PUT", &uri, Some(r#"{"value":1}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("maximum length"));
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    send(&app, "PUT", "/ns/users/42", Some(r#"{"value":{"name":"Ada"},"ttl":60000}"#)).await;
    let (status, json) = send(&app, "GET", "/ns/users/42", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"]["name"], "Ada");
    assert_eq!(json["namespace"], "users");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/ns/users/nonexistent", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_get_from_other_namespace_misses() {
    let app = create_test_app();

    send(&app, "PUT", "/ns/users/42", Some(r#"{"value":"user"}"#)).await;
    let (status, _) = send(&app, "GET", "/ns/admins/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    send(&app, "PUT", "/ns/users/short", Some(r#"{"value":"v","ttl":30}"#)).await;
    let (status, _) = send(&app, "GET", "/ns/users/short", None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let (status, _) = send(&app, "GET", "/ns/users/short", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    send(&app, "PUT", "/ns/users/1", Some(r#"{"value":1}"#)).await;
    let (status, json) = send(&app, "DELETE", "/ns/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "1");

    let (status, _) = send(&app, "GET", "/ns/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_absent_key_succeeds() {
    let app = create_test_app();

    let (status, _) = send(&app, "DELETE", "/ns/users/nonexistent", None).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_clear_endpoint_keeps_other_namespaces() {
    let app = create_test_app();

    send(&app, "PUT", "/ns/users/1", Some(r#"{"value":1}"#)).await;
    send(&app, "PUT", "/ns/users/2", Some(r#"{"value":2}"#)).await;
    send(&app, "PUT", "/ns/admins/1", Some(r#"{"value":"admin"}"#)).await;

    let (status, json) = send(&app, "DELETE", "/ns/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["namespace"], "users");
    assert!(json.get("key").is_none());

    assert_eq!(send(&app, "GET", "/ns/users/1", None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, "GET", "/ns/users/2", None).await.0, StatusCode::NOT_FOUND);
    let (status, json) = send(&app, "GET", "/ns/admins/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "admin");
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    send(&app, "PUT", "/ns/users/stats_key", Some(r#"{"value":"v"}"#)).await;
    send(&app, "GET", "/ns/users/stats_key", None).await;
    send(&app, "GET", "/ns/users/nonexistent", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["requests"], 3);
    assert_eq!(json["hit_rate"], 0.5);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
