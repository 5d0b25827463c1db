//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ListingConfig;
use crate::feed::{OrderFeed, PageRequest};

/// Application state shared across all handlers.
///
/// Generic over the order feed so the router can run against the Shopify
/// client in production and a scripted feed in tests.
pub struct AppState<F> {
    inner: Arc<AppStateInner<F>>,
}

struct AppStateInner<F> {
    listing: ListingConfig,
    feed: F,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: OrderFeed> AppState<F> {
    /// Create state around a feed.
    pub fn new(listing: ListingConfig, feed: F) -> Self {
        Self {
            inner: Arc::new(AppStateInner { listing, feed }),
        }
    }

    /// Listing and receipt settings.
    #[must_use]
    pub fn listing(&self) -> &ListingConfig {
        &self.inner.listing
    }

    /// The upstream order feed.
    #[must_use]
    pub fn feed(&self) -> &F {
        &self.inner.feed
    }

    /// A page request using the configured page and batch sizes.
    #[must_use]
    pub fn page_request(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            page_size: self.inner.listing.page_size,
            batch_size: self.inner.listing.batch_size,
        }
    }
}
