//! Orders list handler.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::feed::{OrderFeed, load_page};
use crate::state::AppState;

use super::types::{OrdersPageResponse, OrdersQuery};

/// Message returned when no page could be produced at all.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch orders.";

/// `GET /orders?page=N`.
///
/// Walks the upstream feed to page `N`. If not even the first batch can be
/// fetched, responds 502 with an empty first page and a generic error.
#[instrument(skip(state))]
pub async fn index<F: OrderFeed>(
    State(state): State<AppState<F>>,
    Query(query): Query<OrdersQuery>,
) -> Response {
    let request = state.page_request(query.page());
    let locale = state.listing().locale;

    match load_page(state.feed(), &request).await {
        Ok(page) => {
            tracing::debug!(
                page = page.page_info.current_page(),
                orders = page.orders.len(),
                outcome = ?page.outcome,
                "Orders page assembled"
            );
            Json(OrdersPageResponse::page(&page, locale)).into_response()
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "Failed to fetch orders"
            );
            (
                StatusCode::BAD_GATEWAY,
                Json(OrdersPageResponse::failed(FETCH_FAILED_MESSAGE)),
            )
                .into_response()
        }
    }
}
