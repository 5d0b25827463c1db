//! Receipt handler.

use axum::{
    Json,
    extract::{Path, State},
};
use receipt_desk_core::ReceiptDocument;
use tracing::instrument;

use crate::error::AppError;
use crate::feed::OrderFeed;
use crate::state::AppState;

/// `GET /orders/{id}/receipt`.
///
/// Fetches one order by internal id and lays it out as a receipt.
///
/// # Errors
///
/// 400 for an id that is not a plain numeric or alphanumeric token, 404 when
/// upstream has no such order, 502 when the fetch fails.
#[instrument(skip(state))]
pub async fn receipt<F: OrderFeed>(
    State(state): State<AppState<F>>,
    Path(id): Path<String>,
) -> Result<Json<ReceiptDocument>, AppError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(AppError::BadRequest(format!("invalid order id: {id}")));
    }

    let order = state
        .feed()
        .fetch_order(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let listing = state.listing();
    Ok(Json(
        ReceiptDocument::build(&order, listing.locale).with_issuer(listing.issuer.clone()),
    ))
}
