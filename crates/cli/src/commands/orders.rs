//! `rd-cli orders` - print one page of orders.

use receipt_desk_admin::config::AdminConfig;
use receipt_desk_admin::feed::{PageRequest, load_page};
use receipt_desk_admin::routes::orders::OrdersPageResponse;
use receipt_desk_admin::shopify::ShopifyClient;

use super::{CliError, write_json};

/// Walk the configured feed to `page` and print it in the same shape the
/// service returns from `GET /orders`.
pub async fn print_page(config: &AdminConfig, page: u32) -> Result<(), CliError> {
    let client = ShopifyClient::new(&config.shopify)?;
    let request = PageRequest {
        page,
        page_size: config.listing.page_size,
        batch_size: config.listing.batch_size,
    };

    tracing::info!(
        store = %client.store(),
        protocol = %client.protocol(),
        page,
        "Fetching orders page"
    );
    let result = load_page(&client, &request).await?;

    if result.page_info.current_page() != page.max(1) {
        tracing::warn!(
            requested = page,
            shown = result.page_info.current_page(),
            outcome = ?result.outcome,
            "Requested page was not reachable"
        );
    }

    write_json(&OrdersPageResponse::page(&result, config.listing.locale))
}
