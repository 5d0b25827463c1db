//! Upstream order feed.
//!
//! [`OrderFeed`] is the seam between the pagination walk and whatever hands
//! out order batches. The Shopify client implements it for both protocols;
//! tests implement it with scripted in-memory feeds.

use std::future::Future;

use receipt_desk_core::{OrderRecord, UpstreamPageInfo};
use thiserror::Error;

use crate::config::Protocol;
use crate::shopify::{ShopifyClient, ShopifyError};

pub mod aggregator;

pub use aggregator::{OrderPage, PageRequest, WalkOutcome, load_page};

/// One upstream batch, already adapted to canonical records.
#[derive(Debug, Clone, Default)]
pub struct FeedBatch {
    /// Records in upstream order.
    pub records: Vec<OrderRecord>,
    /// Continuation state after this batch.
    pub page_info: UpstreamPageInfo,
}

/// Why a batch could not be fetched.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The response arrived but lacks the expected record list.
    #[error("Malformed upstream payload: {0}")]
    Malformed(String),

    /// Network, auth or rate-limit failure.
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[source] ShopifyError),
}

impl From<ShopifyError> for FeedError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::MalformedPayload(msg) => Self::Malformed(msg),
            ShopifyError::Parse(e) => Self::Malformed(e.to_string()),
            other => Self::Upstream(other),
        }
    }
}

/// A cursor-paginated source of orders.
pub trait OrderFeed: Send + Sync + 'static {
    /// Fetch up to `first` records after `cursor` (`None` for the start of
    /// the stream).
    fn fetch_batch(
        &self,
        cursor: Option<&str>,
        first: u32,
    ) -> impl Future<Output = Result<FeedBatch, FeedError>> + Send;

    /// Fetch one order by internal id. `Ok(None)` when it does not exist.
    fn fetch_order(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<OrderRecord>, FeedError>> + Send;
}

impl OrderFeed for ShopifyClient {
    async fn fetch_batch(&self, cursor: Option<&str>, first: u32) -> Result<FeedBatch, FeedError> {
        let (records, page_info) = match self.protocol() {
            Protocol::Rest => self.rest_orders_page(cursor, first).await?,
            Protocol::Graphql => self.graphql_orders_page(cursor, first).await?,
        };
        Ok(FeedBatch { records, page_info })
    }

    async fn fetch_order(&self, id: &str) -> Result<Option<OrderRecord>, FeedError> {
        let order = match self.protocol() {
            Protocol::Rest => self.rest_order(id).await?,
            Protocol::Graphql => self.graphql_order(id).await?,
        };
        Ok(order)
    }
}
