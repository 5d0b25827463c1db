//! JSON views for order routes.

use receipt_desk_core::{LineItem, Locale, OrderRecord, PageInfo};
use serde::{Deserialize, Serialize};

use crate::feed::OrderPage;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the orders list.
///
/// `page` stays a string so a malformed value falls back to page 1 instead
/// of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Requested 1-based page.
    pub page: Option<String>,
}

impl OrdersQuery {
    /// The requested page; missing, non-numeric or non-positive values
    /// mean page 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1)
    }
}

// =============================================================================
// Views
// =============================================================================

/// A line item as shown in the list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    /// Product title.
    pub title: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Formatted unit price.
    pub unit_price: String,
    /// Formatted `quantity × unit_price`.
    pub amount: String,
}

impl LineItemView {
    fn new(item: &LineItem, locale: Locale) -> Self {
        Self {
            title: item.title.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.format(locale),
            amount: item.line_total().format(locale),
        }
    }
}

/// One row of the orders list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListItemView {
    /// Merchant-facing order number, e.g. `#1001`.
    pub display_id: String,
    /// Upstream id used for receipt lookups.
    pub internal_id: String,
    /// Order date (`YYYY-MM-DD`).
    pub date: String,
    /// Raw upstream timestamp.
    pub timestamp: String,
    /// Customer name or the fallback label.
    pub customer_name: String,
    /// Payment status as reported upstream.
    pub financial_status: String,
    /// Fulfillment status, if any.
    pub fulfillment_status: Option<String>,
    /// ISO 4217 currency of the totals.
    pub currency: String,
    /// Formatted subtotal.
    pub subtotal: String,
    /// Formatted tax.
    pub tax: String,
    /// Formatted grand total.
    pub total: String,
    /// Line items in upstream order.
    pub line_items: Vec<LineItemView>,
}

impl OrderListItemView {
    /// Format an order for display in `locale`.
    #[must_use]
    pub fn new(order: &OrderRecord, locale: Locale) -> Self {
        Self {
            display_id: order.display_id.clone(),
            internal_id: order.internal_id.clone(),
            date: order.order_date(),
            timestamp: order.timestamp.clone(),
            customer_name: order.customer_label().to_string(),
            financial_status: order.financial_status.clone(),
            fulfillment_status: order.fulfillment_status.clone(),
            currency: order.totals.total.currency.clone(),
            subtotal: order.totals.subtotal.format(locale),
            tax: order.totals.tax.format(locale),
            total: order.totals.total.format(locale),
            line_items: order
                .line_items
                .iter()
                .map(|item| LineItemView::new(item, locale))
                .collect(),
        }
    }
}

/// Pagination block of the list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    /// Current page and its neighbours.
    #[serde(flatten)]
    pub page_info: PageInfo,
    /// Page count, once the end of the stream was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    /// Order count, once the end of the stream was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
}

/// Body of `GET /orders`.
#[derive(Debug, Clone, Serialize)]
pub struct OrdersPageResponse {
    /// Orders on this page, newest display id first.
    pub orders: Vec<OrderListItemView>,
    /// Pagination block.
    pub pagination: PaginationView,
    /// Generic failure message, present only when no page could be built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrdersPageResponse {
    /// A successfully assembled page.
    #[must_use]
    pub fn page(page: &OrderPage, locale: Locale) -> Self {
        Self {
            orders: page
                .orders
                .iter()
                .map(|order| OrderListItemView::new(order, locale))
                .collect(),
            pagination: PaginationView {
                page_info: page.page_info.clone(),
                total_pages: page.total_pages,
                total_items: page.total_items,
            },
            error: None,
        }
    }

    /// Empty first page carrying a generic failure message.
    #[must_use]
    pub fn failed(message: &str) -> Self {
        Self {
            orders: Vec::new(),
            pagination: PaginationView {
                page_info: PageInfo::first_empty(),
                total_pages: None,
                total_items: None,
            },
            error: Some(message.to_string()),
        }
    }
}
