//! CLI subcommands.

use std::io::Write;

use receipt_desk_admin::config::{AdminConfig, ConfigError, ListingConfig};
use receipt_desk_admin::feed::FeedError;
use receipt_desk_admin::shopify::ShopifyError;
use serde::Serialize;
use thiserror::Error;

pub mod orders;
pub mod receipt;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify client could not be built.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Upstream feed failed.
    #[error("{0}")]
    Feed(#[from] FeedError),

    /// Order does not exist.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Writing the result failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Load configuration from the environment (and `.env`).
pub fn load_config() -> Result<AdminConfig, CliError> {
    Ok(AdminConfig::from_env()?)
}

/// Apply a `--page-size` override.
///
/// The batch size follows the page size unless `ORDERS_BATCH_SIZE` pinned
/// it, so one page is one upstream call.
pub fn override_page_size(listing: &mut ListingConfig, page_size: u32, batch_pinned: bool) {
    listing.page_size = page_size as usize;
    if !batch_pinned {
        listing.batch_size = page_size;
    }
}

/// Whether `ORDERS_BATCH_SIZE` is set to a non-blank value.
#[must_use]
pub fn batch_size_pinned() -> bool {
    std::env::var("ORDERS_BATCH_SIZE").is_ok_and(|v| !v.trim().is_empty())
}

/// Pretty-print `value` as JSON on stdout.
fn write_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(std::io::Error::from)?;
    writeln!(stdout)?;
    Ok(())
}
