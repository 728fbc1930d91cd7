//! Router-level tests: status codes and JSON payloads of every route.

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use donation_proxy::server::{create_router, AppState};
use helpers::{service, two_transactions, MockSource, CONTRACT};
use serde_json::Value;
use tower::ServiceExt;

fn app(source: Arc<MockSource>) -> Router {
    create_router(AppState::new(Arc::new(service(source))))
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_list_reports_source() {
    let source = Arc::new(MockSource::new(two_transactions()));
    let app = app(source.clone());

    let (status, body) = send(&app, "GET", "/api/transactions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "upstream");
    assert_eq!(body["contract"], CONTRACT);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["value"], "1.000000");
    assert_eq!(body["data"][1]["value"], "0.000150");
    assert_eq!(body["data"][1]["id"], 2);

    let (_, body) = send(&app, "GET", "/api/transactions").await;
    assert_eq!(body["source"], "cache");
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_list_failure_without_cache() {
    let app = app(Arc::new(MockSource::failing()));

    let (status, body) = send(&app, "GET", "/api/transactions").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to fetch transactions from blockchain");
    assert!(body["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_lookup_by_hash() {
    let app = app(Arc::new(MockSource::new(two_transactions())));

    let (status, body) = send(&app, "GET", "/api/transactions/0xabcdef0001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["hash"], "0xABCDEF0001");
    assert_eq!(body["data"]["status"], "success");

    let (status, body) = send(&app, "GET", "/api/transactions/0x404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        serde_json::json!({"success": false, "error": "Transaction not found"})
    );
}

#[tokio::test]
async fn test_lookup_upstream_failure() {
    let app = app(Arc::new(MockSource::failing()));

    let (status, body) = send(&app, "GET", "/api/transactions/0xabcdef0001").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server Error");
}

#[tokio::test]
async fn test_refresh() {
    let source = Arc::new(MockSource::new(two_transactions()));
    let app = app(source.clone());

    let (status, body) = send(&app, "POST", "/api/transactions/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"success": true, "message": "Cache refreshed", "count": 2})
    );

    source.set_failing(true);
    let (status, body) = send(&app, "POST", "/api/transactions/refresh").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to refresh");

    // the snapshot from the first refresh is still served
    let (status, body) = send(&app, "GET", "/api/transactions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "cache");
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_balance() {
    let source = Arc::new(MockSource::new(Vec::new()));
    let app = app(source.clone());

    let (status, body) = send(&app, "GET", "/api/transactions/balance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "success": true,
            "contract": CONTRACT,
            "balance": "2.500000",
            "unit": "ETH"
        })
    );

    source.set_failing(true);
    let (status, body) = send(&app, "GET", "/api/transactions/balance").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch balance");
}

#[tokio::test]
async fn test_health() {
    let app = app(Arc::new(MockSource::new(two_transactions())));

    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cacheTtlSeconds"], 30);
    assert_eq!(body["cachedRecords"], Value::Null);
    assert_eq!(body["cacheAgeSeconds"], Value::Null);

    send(&app, "GET", "/api/transactions").await;
    let (_, body) = send(&app, "GET", "/health").await;
    assert_eq!(body["cachedRecords"], 2);
    assert!(body["cacheAgeSeconds"].is_u64());
}
