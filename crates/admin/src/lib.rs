//! Receipt Desk service library.
//!
//! Lists a Shopify store's orders page by page and lays single orders out as
//! fixed-format receipts. Everything is re-fetched from the Admin API on each
//! request; nothing is stored locally.
//!
//! # Security
//!
//! This crate holds a Shopify Admin API access token. Grant it `read_orders`
//! only.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub mod config;
pub mod error;
pub mod feed;
pub mod routes;
pub mod shopify;
pub mod state;

use feed::OrderFeed;
use state::AppState;

/// Build the application router with request tracing.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app<F: OrderFeed>(state: AppState<F>) -> Router {
    routes::routes::<F>()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
