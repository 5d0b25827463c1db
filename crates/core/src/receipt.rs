//! Fixed-layout receipt documents.
//!
//! A printed receipt always has exactly [`RECEIPT_ROWS`] line-item rows so
//! the physical layout never shifts: short orders are padded with blank rows
//! and long ones are cut after the tenth item.

use serde::Serialize;

use crate::types::{Locale, MoneyAmount, OrderRecord};

/// Number of line-item rows on every receipt.
pub const RECEIPT_ROWS: usize = 10;

const TITLE: &str = "領収書";
const HONORIFIC: &str = "様";
const SUBTOTAL_LABEL: &str = "小計";
const SHIPPING_LABEL: &str = "送料";
// Static text: the receipt always states 10% whatever the actual ratio is.
const TAX_LABEL: &str = "税 (10%)";
const TOTAL_LABEL: &str = "合計";

/// The business issuing the receipt, printed opposite the addressee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptIssuer {
    /// Shop or company name.
    pub name: String,
    /// Address and contact lines, top to bottom.
    pub address_lines: Vec<String>,
}

/// One row of the line-item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReceiptRow {
    /// A real line item.
    Item {
        /// Product title.
        title: String,
        /// Formatted unit price.
        unit_price: String,
        /// Quantity ordered.
        quantity: u32,
        /// Formatted `quantity × unit_price`.
        amount: String,
    },
    /// Placeholder row keeping the table at a fixed height.
    Blank,
}

/// A labelled amount in the receipt footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLine {
    /// Row label.
    pub label: String,
    /// Formatted amount.
    pub amount: String,
}

/// Footer of the line-item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptFooter {
    /// Subtotal before tax.
    pub subtotal: FooterLine,
    /// Shipping, always zero.
    pub shipping: FooterLine,
    /// Tax in parentheses, labelled with the static 10% rate.
    pub tax: FooterLine,
    /// Grand total.
    pub total: FooterLine,
}

/// A receipt laid out for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptDocument {
    /// Document title.
    pub title: String,
    /// Order display id, printed as the receipt number.
    pub receipt_number: String,
    /// Order date (`YYYY-MM-DD`).
    pub issued_on: String,
    /// Customer name or the fallback label.
    pub addressee: String,
    /// Honorific printed after the addressee.
    pub honorific: String,
    /// Formatted grand total shown above the table.
    pub grand_total: String,
    /// Issuing business, when configured.
    pub issuer: Option<ReceiptIssuer>,
    /// Exactly [`RECEIPT_ROWS`] rows.
    pub rows: Vec<ReceiptRow>,
    /// Subtotal, shipping, tax and total.
    pub footer: ReceiptFooter,
}

impl ReceiptDocument {
    /// Lay out a receipt for `order`, formatting money in `locale`.
    #[must_use]
    pub fn build(order: &OrderRecord, locale: Locale) -> Self {
        let mut rows: Vec<ReceiptRow> = order
            .line_items
            .iter()
            .take(RECEIPT_ROWS)
            .map(|item| ReceiptRow::Item {
                title: item.title.clone(),
                unit_price: item.unit_price.format(locale),
                quantity: item.quantity,
                amount: item.line_total().format(locale),
            })
            .collect();
        rows.resize(RECEIPT_ROWS, ReceiptRow::Blank);

        if order.line_items.len() > RECEIPT_ROWS {
            tracing::debug!(
                order = %order.display_id,
                items = order.line_items.len(),
                "Receipt truncated to {RECEIPT_ROWS} rows"
            );
        }

        let totals = &order.totals;
        let grand_total = totals.total.format(locale);
        let footer = ReceiptFooter {
            subtotal: line(SUBTOTAL_LABEL, totals.subtotal.format(locale)),
            shipping: line(
                SHIPPING_LABEL,
                MoneyAmount::zero(&totals.total.currency).format(locale),
            ),
            // Tax is already included in the total.
            tax: line(TAX_LABEL, format!("({})", totals.tax.format(locale))),
            total: line(TOTAL_LABEL, grand_total.clone()),
        };

        Self {
            title: TITLE.to_string(),
            receipt_number: order.display_id.clone(),
            issued_on: order.order_date(),
            addressee: order.customer_label().to_string(),
            honorific: HONORIFIC.to_string(),
            grand_total,
            issuer: None,
            rows,
            footer,
        }
    }

    /// Attach the issuing business.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Option<ReceiptIssuer>) -> Self {
        self.issuer = issuer;
        self
    }

    /// Rows that carry a real line item.
    #[must_use]
    pub fn item_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, ReceiptRow::Item { .. }))
            .count()
    }
}

fn line(label: &str, amount: String) -> FooterLine {
    FooterLine {
        label: label.to_string(),
        amount,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{CUSTOMER_FALLBACK_LABEL, LineItem, OrderTotals};

    fn yen(value: i64) -> MoneyAmount {
        MoneyAmount::new(Decimal::from(value), "JPY")
    }

    fn order_with_items(count: usize) -> OrderRecord {
        OrderRecord {
            display_id: "#2001".to_string(),
            internal_id: "2001".to_string(),
            timestamp: "2024-05-10T12:00:00+09:00".to_string(),
            customer_name: None,
            financial_status: "paid".to_string(),
            fulfillment_status: Some("fulfilled".to_string()),
            line_items: (1..=count)
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

    #[test]
    fn test_three_items_pad_to_ten_rows() {
        let receipt = ReceiptDocument::build(&order_with_items(3), Locale::JaJp);
        assert_eq!(receipt.rows.len(), RECEIPT_ROWS);
        assert_eq!(receipt.item_rows(), 3);
        assert!(
            receipt
                .rows
                .iter()
                .skip(3)
                .all(|row| *row == ReceiptRow::Blank)
        );
    }

    #[test]
    fn test_thirteen_items_truncate_to_ten() {
        let receipt = ReceiptDocument::build(&order_with_items(13), Locale::JaJp);
        assert_eq!(receipt.rows.len(), RECEIPT_ROWS);
        assert_eq!(receipt.item_rows(), RECEIPT_ROWS);
        assert!(matches!(
            receipt.rows.last(),
            Some(ReceiptRow::Item { title, .. }) if title == "Item 10"
        ));
    }

    #[test]
    fn test_row_amount_is_quantity_times_unit_price() {
        let receipt = ReceiptDocument::build(&order_with_items(1), Locale::JaJp);
        assert_eq!(
            receipt.rows.first(),
            Some(&ReceiptRow::Item {
                title: "Item 1".to_string(),
                unit_price: "￥500".to_string(),
                quantity: 2,
                amount: "￥1,000".to_string(),
            })
        );
    }

    #[test]
    fn test_footer_lines() {
        let receipt = ReceiptDocument::build(&order_with_items(1), Locale::JaJp);
        assert_eq!(receipt.footer.subtotal.amount, "￥1,000");
        assert_eq!(receipt.footer.shipping.amount, "￥0");
        assert_eq!(receipt.footer.tax.amount, "(￥100)");
        assert_eq!(receipt.footer.total.amount, "￥1,100");
        assert_eq!(receipt.grand_total, "￥1,100");
    }

    // The 10% label is static text and must not follow the real tax ratio.
    #[test]
    fn test_tax_label_ignores_actual_ratio() {
        let mut order = order_with_items(1);
        order.totals.tax = yen(80);
        let receipt = ReceiptDocument::build(&order, Locale::JaJp);
        assert_eq!(receipt.footer.tax.label, "税 (10%)");
    }

    #[test]
    fn test_header_fields() {
        let receipt = ReceiptDocument::build(&order_with_items(0), Locale::JaJp);
        assert_eq!(receipt.title, "領収書");
        assert_eq!(receipt.receipt_number, "#2001");
        assert_eq!(receipt.issued_on, "2024-05-10");
        assert_eq!(receipt.addressee, CUSTOMER_FALLBACK_LABEL);
        assert_eq!(receipt.item_rows(), 0);
        assert!(receipt.issuer.is_none());
    }

    #[test]
    fn test_with_issuer() {
        let issuer = ReceiptIssuer {
            name: "1acspaces".to_string(),
            address_lines: vec!["107-0062".to_string()],
        };
        let receipt =
            ReceiptDocument::build(&order_with_items(0), Locale::JaJp).with_issuer(Some(issuer));
        assert_eq!(receipt.issuer.map(|i| i.name), Some("1acspaces".to_string()));
    }
}
