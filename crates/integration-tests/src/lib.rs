//! Integration test support for Receipt Desk.
//!
//! [`ScriptedFeed`] stands in for Shopify: it serves a fixed list of
//! batches addressed by synthetic cursors (`c1`, `c2`, ...) and records every
//! cursor it is asked for, so tests can check both what a walk produced and
//! how it got there.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p receipt-desk-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use receipt_desk_admin::feed::{FeedBatch, FeedError, OrderFeed};
use receipt_desk_admin::shopify::ShopifyError;
use receipt_desk_core::{LineItem, MoneyAmount, OrderRecord, OrderTotals, UpstreamPageInfo};
use rust_decimal::Decimal;

/// One scripted upstream response.
#[derive(Debug, Clone)]
enum Step {
    Batch(Vec<OrderRecord>),
    Malformed,
    Unavailable,
}

/// In-memory order feed driven by a script.
#[derive(Debug, Default)]
pub struct ScriptedFeed {
    steps: Vec<Step>,
    orders: HashMap<String, OrderRecord>,
    order_lookup_fails: bool,
    calls: Mutex<Vec<Option<String>>>,
}

impl ScriptedFeed {
    /// An empty script; every fetch beyond it is a malformed payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `total` orders served in batches of `batch_size`, newest first.
    #[must_use]
    pub fn paged(total: usize, batch_size: usize) -> Self {
        let records: Vec<OrderRecord> = (0..total).rev().map(|n| order(n, 1)).collect();
        records
            .chunks(batch_size.max(1))
            .fold(Self::new(), |feed, chunk| feed.batch(chunk.to_vec()))
    }

    /// Append a successful batch.
    #[must_use]
    pub fn batch(mut self, records: Vec<OrderRecord>) -> Self {
        self.steps.push(Step::Batch(records));
        self
    }

    /// Append a batch whose payload lacks the record list.
    #[must_use]
    pub fn malformed(mut self) -> Self {
        self.steps.push(Step::Malformed);
        self
    }

    /// Append a transport failure.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.steps.push(Step::Unavailable);
        self
    }

    /// Make `record` available to single-order lookups.
    #[must_use]
    pub fn with_order(mut self, record: OrderRecord) -> Self {
        self.orders.insert(record.internal_id.clone(), record);
        self
    }

    /// Make every single-order lookup fail upstream.
    #[must_use]
    pub fn failing_lookups(mut self) -> Self {
        self.order_lookup_fails = true;
        self
    }

    /// Cursors requested so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn step_index(cursor: Option<&str>) -> Option<usize> {
        match cursor {
            None => Some(0),
            Some(c) => c.strip_prefix('c').and_then(|n| n.parse().ok()),
        }
    }
}

fn unavailable() -> FeedError {
    FeedError::Upstream(ShopifyError::Status {
        status: 503,
        body: "Service Unavailable".to_string(),
    })
}

impl OrderFeed for ScriptedFeed {
    async fn fetch_batch(&self, cursor: Option<&str>, _first: u32) -> Result<FeedBatch, FeedError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(cursor.map(String::from));
        }

        let index = Self::step_index(cursor)
            .ok_or_else(|| FeedError::Malformed(format!("unknown cursor {cursor:?}")))?;

        match self.steps.get(index) {
            Some(Step::Batch(records)) => {
                let has_next_page = index + 1 < self.steps.len();
                Ok(FeedBatch {
                    records: records.clone(),
                    page_info: UpstreamPageInfo {
                        has_next_page,
                        end_cursor: has_next_page.then(|| format!("c{}", index + 1)),
                    },
                })
            }
            Some(Step::Unavailable) => Err(unavailable()),
            Some(Step::Malformed) | None => {
                Err(FeedError::Malformed("response has no orders list".to_string()))
            }
        }
    }

    async fn fetch_order(&self, id: &str) -> Result<Option<OrderRecord>, FeedError> {
        if self.order_lookup_fails {
            return Err(unavailable());
        }
        Ok(self.orders.get(id).cloned())
    }
}

/// Fixture order `#{n:05}` with `items` line items of ¥500 × 2.
#[must_use]
pub fn order(n: usize, items: usize) -> OrderRecord {
    OrderRecord {
        display_id: format!("#{n:05}"),
        internal_id: format!("{}", 90_000 + n),
        timestamp: "2024-05-10T12:00:00+09:00".to_string(),
        customer_name: None,
        financial_status: "paid".to_string(),
        fulfillment_status: Some("fulfilled".to_string()),
        line_items: (1..=items)
            .map(|i| LineItem {
                title: format!("Item {i}"),
                quantity: 2,
                unit_price: yen(500),
            })
            .collect(),
        totals: OrderTotals {
            total: yen(1100),
            subtotal: yen(1000),
            tax: yen(100),
        },
    }
}

/// Whole yen amount.
#[must_use]
pub fn yen(value: i64) -> MoneyAmount {
    MoneyAmount::new(Decimal::from(value), "JPY")
}

/// Display ids of `records`, in order.
#[must_use]
pub fn display_ids(records: &[OrderRecord]) -> Vec<String> {
    records.iter().map(|r| r.display_id.clone()).collect()
}
