//! `rd-cli receipt` - print one order's receipt.

use receipt_desk_admin::config::AdminConfig;
use receipt_desk_admin::feed::OrderFeed;
use receipt_desk_admin::shopify::ShopifyClient;
use receipt_desk_core::ReceiptDocument;

use super::{CliError, write_json};

/// Fetch order `id` and print its receipt layout.
pub async fn print_receipt(config: &AdminConfig, id: &str) -> Result<(), CliError> {
    let client = ShopifyClient::new(&config.shopify)?;
    let order = client
        .fetch_order(id)
        .await?
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;

    if order.line_items.len() > receipt_desk_core::RECEIPT_ROWS {
        tracing::warn!(
            order = %order.display_id,
            items = order.line_items.len(),
            "Receipt shows only the first {} line items",
            receipt_desk_core::RECEIPT_ROWS
        );
    }

    let receipt = ReceiptDocument::build(&order, config.listing.locale)
        .with_issuer(config.listing.issuer.clone());
    write_json(&receipt)
}
