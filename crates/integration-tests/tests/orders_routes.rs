//! Integration tests for the HTTP surface.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` over a
//! scripted feed.

#![allow(clippy::unwrap_used)]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use receipt_desk_admin::config::ListingConfig;
use receipt_desk_admin::state::AppState;
use receipt_desk_core::{Locale, ReceiptIssuer};
use receipt_desk_integration_tests::{ScriptedFeed, order};
use serde_json::{Value, json};
use tower::ServiceExt;

fn listing() -> ListingConfig {
    ListingConfig {
        page_size: 5,
        batch_size: 5,
        locale: Locale::JaJp,
        issuer: Some(ReceiptIssuer {
            name: "Tea Shop".to_string(),
            address_lines: vec!["Tokyo".to_string()],
        }),
    }
}

async fn get(feed: ScriptedFeed, uri: &str) -> (StatusCode, Value) {
    let app = receipt_desk_admin::app(AppState::new(listing(), feed));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, body)
}

// ============================================================================
// GET /orders
// ============================================================================

#[tokio::test]
async fn test_first_page() {
    let (status, body) = get(ScriptedFeed::paged(12, 5), "/orders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["orders"][0]["displayId"], "#00011");
    assert_eq!(body["orders"][0]["customerName"], "顧客情報無し");
    assert_eq!(body["orders"][0]["total"], "￥1,100");
    assert_eq!(body["orders"][0]["date"], "2024-05-10");
    assert_eq!(
        body["pagination"],
        json!({"currentPage": 1, "hasNextPage": true, "hasPreviousPage": false})
    );
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_invalid_page_falls_back_to_first() {
    for uri in ["/orders?page=abc", "/orders?page=0", "/orders?page=-2"] {
        let (status, body) = get(ScriptedFeed::paged(3, 5), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["pagination"]["currentPage"], 1, "{uri}");
    }
}

#[tokio::test]
async fn test_last_page_reports_totals() {
    let (status, body) = get(ScriptedFeed::paged(12, 5), "/orders?page=9").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        body["pagination"],
        json!({
            "currentPage": 3,
            "hasNextPage": false,
            "hasPreviousPage": true,
            "totalPages": 3,
            "totalItems": 12
        })
    );
}

#[tokio::test]
async fn test_recovered_page_is_not_an_error() {
    let feed = ScriptedFeed::new()
        .batch((0..5).map(|n| order(n, 1)).collect())
        .malformed();
    let (status, body) = get(feed, "/orders?page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_upstream_failure_returns_empty_first_page() {
    let (status, body) = get(ScriptedFeed::new().unavailable(), "/orders?page=4").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body,
        json!({
            "orders": [],
            "pagination": {"currentPage": 1, "hasNextPage": false, "hasPreviousPage": false},
            "error": "Failed to fetch orders."
        })
    );
}

// ============================================================================
// GET /orders/{id}/receipt
// ============================================================================

#[tokio::test]
async fn test_receipt() {
    let feed = ScriptedFeed::new().with_order(order(7, 3));
    let (status, body) = get(feed, "/orders/90007/receipt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "領収書");
    assert_eq!(body["receipt_number"], "#00007");
    assert_eq!(body["addressee"], "顧客情報無し");
    assert_eq!(body["honorific"], "様");
    assert_eq!(body["issuer"]["name"], "Tea Shop");
    assert_eq!(body["rows"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["rows"][0]["kind"], "item");
    assert_eq!(body["rows"][0]["amount"], "￥1,000");
    assert_eq!(body["rows"][3], json!({"kind": "blank"}));
    assert_eq!(body["footer"]["total"]["amount"], "￥1,100");
    assert_eq!(body["footer"]["tax"]["amount"], "(￥100)");
}

#[tokio::test]
async fn test_receipt_not_found() {
    let (status, body) = get(ScriptedFeed::new(), "/orders/12345/receipt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found: order 12345"}));
}

#[tokio::test]
async fn test_receipt_invalid_id() {
    let (status, _) = get(ScriptedFeed::new(), "/orders/12.45/receipt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_receipt_upstream_failure() {
    let feed = ScriptedFeed::new().failing_lookups();
    let (status, body) = get(feed, "/orders/90001/receipt").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "External service error"}));
}

// ============================================================================
// GET /health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(ScriptedFeed::new(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}
