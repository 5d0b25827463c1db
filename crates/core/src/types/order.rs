//! Canonical order record.
//!
//! Both upstream payload shapes (GraphQL and REST) are adapted into an
//! [`OrderRecord`] before anything is displayed or printed.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::money::MoneyAmount;

/// Label shown in place of a customer name when the order has none.
pub const CUSTOMER_FALLBACK_LABEL: &str = "顧客情報無し";

/// A line item on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product title.
    pub title: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: MoneyAmount,
}

impl LineItem {
    /// `quantity × unit_price`, computed on demand.
    #[must_use]
    pub fn line_total(&self) -> MoneyAmount {
        self.unit_price.times(self.quantity)
    }
}

/// Order-level money totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Grand total.
    pub total: MoneyAmount,
    /// Sum of line items before tax.
    pub subtotal: MoneyAmount,
    /// Total tax.
    pub tax: MoneyAmount,
}

/// A merchant order in its canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Merchant-visible order name (e.g. `#1001`). Not numerically sortable.
    pub display_id: String,
    /// Opaque platform identifier.
    pub internal_id: String,
    /// ISO 8601 processing instant as sent upstream.
    pub timestamp: String,
    /// Customer display name, if a customer is attached.
    pub customer_name: Option<String>,
    /// Financial status, passed through verbatim.
    pub financial_status: String,
    /// Fulfillment status, passed through verbatim.
    pub fulfillment_status: Option<String>,
    /// Line items in upstream order.
    pub line_items: Vec<LineItem>,
    /// Order totals.
    pub totals: OrderTotals,
}

impl OrderRecord {
    /// Customer name, or [`CUSTOMER_FALLBACK_LABEL`] when absent.
    #[must_use]
    pub fn customer_label(&self) -> &str {
        self.customer_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(CUSTOMER_FALLBACK_LABEL)
    }

    /// The timestamp truncated to the day (`YYYY-MM-DD`).
    ///
    /// RFC 3339 timestamps keep the calendar date of their own offset.
    /// Anything else is cut at the `T` separator.
    #[must_use]
    pub fn order_date(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp).map_or_else(
            |_| {
                self.timestamp
                    .split('T')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            },
            |dt| dt.format("%Y-%m-%d").to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn record(customer_name: Option<&str>, timestamp: &str) -> OrderRecord {
        OrderRecord {
            display_id: "#1001".to_string(),
            internal_id: "1".to_string(),
            timestamp: timestamp.to_string(),
            customer_name: customer_name.map(String::from),
            financial_status: "paid".to_string(),
            fulfillment_status: None,
            line_items: vec![],
            totals: OrderTotals {
                total: MoneyAmount::zero("JPY"),
                subtotal: MoneyAmount::zero("JPY"),
                tax: MoneyAmount::zero("JPY"),
            },
        }
    }

    #[test]
    fn test_customer_label_fallback() {
        assert_eq!(record(None, "").customer_label(), CUSTOMER_FALLBACK_LABEL);
        assert_eq!(record(Some("  "), "").customer_label(), CUSTOMER_FALLBACK_LABEL);
        assert_eq!(record(Some("山田 太郎"), "").customer_label(), "山田 太郎");
    }

    #[test]
    fn test_order_date_keeps_offset_date() {
        let order = record(None, "2024-03-01T23:30:00+09:00");
        assert_eq!(order.order_date(), "2024-03-01");
    }

    #[test]
    fn test_order_date_non_rfc3339() {
        assert_eq!(record(None, "2024-03-01T10:00").order_date(), "2024-03-01");
        assert_eq!(record(None, "").order_date(), "");
    }

    #[test]
    fn test_line_total() {
        let item = LineItem {
            title: "Notebook".to_string(),
            quantity: 4,
            unit_price: MoneyAmount::new(Decimal::new(1250, 2), "USD"),
        };
        assert_eq!(item.line_total().value, Decimal::new(5000, 2));
        assert_eq!(item.line_total().currency, "USD");
    }
}
