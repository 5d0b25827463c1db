//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Orders (read from Shopify)
//! GET  /orders?page=N          - One page of orders as JSON
//! GET  /orders/{id}/receipt    - Printable receipt for one order as JSON
//! ```

use axum::{Router, routing::get};

use crate::feed::OrderFeed;
use crate::state::AppState;

pub mod orders;

/// Build the router for a given feed.
pub fn routes<F: OrderFeed>() -> Router<AppState<F>> {
    Router::new()
        .route("/health", get(health))
        .route("/orders", get(orders::index::<F>))
        .route("/orders/{id}/receipt", get(orders::receipt::<F>))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstream.
pub async fn health() -> &'static str {
    "ok"
}
