//! Raw order to canonical [`OrderRecord`] conversion.
//!
//! Every conversion here is total. Missing or mistyped fields become safe
//! defaults (empty strings, zero quantity, zero money, no customer) so a
//! single odd record never costs the merchant a whole page.

use receipt_desk_core::{LineItem, MoneyAmount, OrderRecord, OrderTotals, UpstreamPageInfo};
use serde_json::Value;

use super::ShopifyError;
use super::link_header;
use super::raw::{GraphqlOrder, GraphqlPageInfo, MoneyBag, RestOrder};

const ORDER_GID_PREFIX: &str = "gid://shopify/Order/";

/// A raw upstream record tagged with its payload shape.
#[derive(Debug, Clone)]
pub enum RawOrder {
    /// GraphQL `orders` node.
    ShapeA(GraphqlOrder),
    /// REST `orders.json` record.
    ShapeB(RestOrder),
}

impl RawOrder {
    /// Decode a GraphQL node. Anything that is not an object decodes to an
    /// empty record.
    #[must_use]
    pub fn graphql(value: Value) -> Self {
        Self::ShapeA(serde_json::from_value(value).unwrap_or_default())
    }

    /// Decode a REST order.
    #[must_use]
    pub fn rest(value: Value) -> Self {
        Self::ShapeB(serde_json::from_value(value).unwrap_or_default())
    }
}

/// Convert one raw record. `default_currency` applies to any amount whose
/// currency code is missing.
#[must_use]
pub fn adapt(raw: RawOrder, default_currency: &str) -> OrderRecord {
    match raw {
        RawOrder::ShapeA(order) => adapt_graphql(order, default_currency),
        RawOrder::ShapeB(order) => adapt_rest(order, default_currency),
    }
}

// =============================================================================
// Page containers
// =============================================================================

/// Convert a GraphQL `orders` connection.
///
/// Accepts either `nodes` or `edges[].node`. Missing both is a malformed
/// payload.
///
/// # Errors
///
/// Returns `ShopifyError::MalformedPayload` when no record list is present.
pub fn adapt_graphql_page(
    connection: &Value,
    default_currency: &str,
) -> Result<(Vec<OrderRecord>, UpstreamPageInfo), ShopifyError> {
    let nodes: Vec<Value> = if let Some(nodes) = connection.get("nodes").and_then(Value::as_array)
    {
        nodes.clone()
    } else if let Some(edges) = connection.get("edges").and_then(Value::as_array) {
        edges
            .iter()
            .map(|edge| edge.get("node").cloned().unwrap_or(Value::Null))
            .collect()
    } else {
        return Err(ShopifyError::MalformedPayload(
            "orders connection has neither nodes nor edges".to_string(),
        ));
    };

    let records = nodes
        .into_iter()
        .map(|node| adapt(RawOrder::graphql(node), default_currency))
        .collect();

    let page_info: GraphqlPageInfo = connection
        .get("pageInfo")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    Ok((
        records,
        UpstreamPageInfo {
            has_next_page: page_info.has_next_page,
            end_cursor: page_info.end_cursor.filter(|c| !c.is_empty()),
        },
    ))
}

/// Convert a REST `orders.json` response: the `Link` header carries the
/// cursor, the body carries `{orders: [...]}`.
///
/// # Errors
///
/// Returns `ShopifyError::MalformedPayload` when `orders` is not a list.
pub fn adapt_rest_page(
    link: Option<&str>,
    body: &Value,
    default_currency: &str,
) -> Result<(Vec<OrderRecord>, UpstreamPageInfo), ShopifyError> {
    let orders = body
        .get("orders")
        .and_then(Value::as_array)
        .ok_or_else(|| ShopifyError::MalformedPayload("response has no orders list".to_string()))?;

    let records = orders
        .iter()
        .cloned()
        .map(|order| adapt(RawOrder::rest(order), default_currency))
        .collect();

    Ok((records, link_header::parse_next(link)))
}

// =============================================================================
// Shape A
// =============================================================================

fn adapt_graphql(order: GraphqlOrder, default_currency: &str) -> OrderRecord {
    let line_items = order
        .line_items
        .edges
        .into_iter()
        .filter_map(|edge| edge.node)
        .map(|node| LineItem {
            title: node.title.unwrap_or_default(),
            quantity: quantity(node.quantity.as_ref()),
            unit_price: bag_amount(node.original_unit_price_set.as_ref(), default_currency),
        })
        .collect();

    OrderRecord {
        display_id: order.name.unwrap_or_default(),
        internal_id: internal_id(order.id.as_ref()),
        timestamp: order.processed_at.or(order.created_at).unwrap_or_default(),
        customer_name: order
            .customer
            .and_then(|c| c.display_name)
            .and_then(non_blank),
        financial_status: order.display_financial_status.unwrap_or_default(),
        fulfillment_status: order.display_fulfillment_status,
        line_items,
        totals: OrderTotals {
            total: bag_amount(order.total_price_set.as_ref(), default_currency),
            subtotal: bag_amount(order.subtotal_price_set.as_ref(), default_currency),
            tax: bag_amount(order.total_tax_set.as_ref(), default_currency),
        },
    }
}

fn bag_amount(bag: Option<&MoneyBag>, default_currency: &str) -> MoneyAmount {
    let money = bag.and_then(|b| b.presentment_money.as_ref());
    let currency = money
        .and_then(|m| m.currency_code.as_deref())
        .filter(|c| !c.is_empty())
        .unwrap_or(default_currency);
    MoneyAmount::normalize(money.and_then(|m| m.amount.as_ref()), currency)
}

// =============================================================================
// Shape B
// =============================================================================

fn adapt_rest(order: RestOrder, default_currency: &str) -> OrderRecord {
    let currency = order
        .currency
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(default_currency);

    let line_items = order
        .line_items
        .into_iter()
        .map(|item| LineItem {
            title: item.title.unwrap_or_default(),
            quantity: quantity(item.quantity.as_ref()),
            unit_price: MoneyAmount::normalize(item.price.as_ref(), currency),
        })
        .collect();

    let customer_name = order.customer.and_then(|c| {
        let full = format!(
            "{} {}",
            c.first_name.unwrap_or_default().trim(),
            c.last_name.unwrap_or_default().trim()
        );
        non_blank(full)
    });

    OrderRecord {
        display_id: order.name.unwrap_or_default(),
        internal_id: internal_id(order.id.as_ref()),
        timestamp: order.processed_at.or(order.created_at).unwrap_or_default(),
        customer_name,
        financial_status: order.financial_status.unwrap_or_default(),
        fulfillment_status: order.fulfillment_status,
        line_items,
        totals: OrderTotals {
            total: MoneyAmount::normalize(order.total_price.as_ref(), currency),
            subtotal: MoneyAmount::normalize(order.subtotal_price.as_ref(), currency),
            tax: MoneyAmount::normalize(order.total_tax.as_ref(), currency),
        },
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Stringify an id. GraphQL order GIDs are reduced to their numeric tail so
/// both shapes agree on the same id.
fn internal_id(raw: Option<&Value>) -> String {
    let id = match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    match id.strip_prefix(ORDER_GID_PREFIX) {
        Some(tail) => tail.to_string(),
        None => id,
    }
}

/// Quantity from a number or numeric string; negatives and junk are `0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantity(raw: Option<&Value>) -> u32 {
    match raw {
        Some(Value::Number(n)) => n.as_u64().map_or_else(
            || {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map_or(0, |f| f.trunc().min(f64::from(u32::MAX)) as u32)
            },
            |q| u32::try_from(q).unwrap_or(u32::MAX),
        ),
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn graphql_fixture() -> Value {
        json!({
            "name": "#1001",
            "id": "gid://shopify/Order/5001",
            "processedAt": "2024-04-01T09:30:00+09:00",
            "customer": {"displayName": "Hanako Sato"},
            "displayFinancialStatus": "paid",
            "displayFulfillmentStatus": "fulfilled",
            "lineItems": {"edges": [
                {"node": {
                    "title": "Matcha",
                    "quantity": 2,
                    "originalUnitPriceSet": {"presentmentMoney": {"amount": "1500.0", "currencyCode": "JPY"}}
                }},
                {"node": {
                    "title": "Whisk",
                    "quantity": 1,
                    "originalUnitPriceSet": {"presentmentMoney": {"amount": "800", "currencyCode": "JPY"}}
                }}
            ]},
            "totalPriceSet": {"presentmentMoney": {"amount": "4180", "currencyCode": "JPY"}},
            "subtotalPriceSet": {"presentmentMoney": {"amount": "3800", "currencyCode": "JPY"}},
            "totalTaxSet": {"presentmentMoney": {"amount": "380", "currencyCode": "JPY"}}
        })
    }

    fn rest_fixture() -> Value {
        json!({
            "name": "#1001",
            "id": 5001,
            "processed_at": "2024-04-01T09:30:00+09:00",
            "customer": {"first_name": "Hanako", "last_name": "Sato"},
            "financial_status": "paid",
            "fulfillment_status": "fulfilled",
            "line_items": [
                {"title": "Matcha", "quantity": 2, "price": "1500.00"},
                {"title": "Whisk", "quantity": 1, "price": "800.00"}
            ],
            "total_price": "4180.00",
            "subtotal_price": "3800.00",
            "total_tax": "380.00",
            "currency": "JPY"
        })
    }

    #[test]
    fn test_shapes_adapt_to_equal_records() {
        let a = adapt(RawOrder::graphql(graphql_fixture()), "USD");
        let b = adapt(RawOrder::rest(rest_fixture()), "USD");
        assert_eq!(a, b);
        assert_eq!(a.internal_id, "5001");
        assert_eq!(a.customer_label(), "Hanako Sato");
        assert_eq!(a.line_items.len(), 2);
        assert_eq!(a.totals.total.value, Decimal::from(4180));
    }

    #[test]
    fn test_all_fields_missing() {
        for raw in [RawOrder::graphql(json!({})), RawOrder::rest(json!({}))] {
            let record = adapt(raw, "JPY");
            assert_eq!(record.display_id, "");
            assert_eq!(record.internal_id, "");
            assert!(record.customer_name.is_none());
            assert_eq!(record.financial_status, "");
            assert!(record.line_items.is_empty());
            assert_eq!(record.totals.total, MoneyAmount::zero("JPY"));
        }
    }

    #[test]
    fn test_non_object_record_is_empty() {
        let record = adapt(RawOrder::rest(json!("oops")), "JPY");
        assert_eq!(record.display_id, "");
    }

    #[test]
    fn test_missing_customer_matches_across_shapes() {
        let mut a = graphql_fixture();
        a["customer"] = Value::Null;
        let mut b = rest_fixture();
        b["customer"] = Value::Null;
        let a = adapt(RawOrder::graphql(a), "JPY");
        let b = adapt(RawOrder::rest(b), "JPY");
        assert!(a.customer_name.is_none());
        assert_eq!(a.customer_label(), b.customer_label());
    }

    #[test]
    fn test_rest_customer_partial_name() {
        let mut raw = rest_fixture();
        raw["customer"] = json!({"first_name": null, "last_name": " Sato "});
        assert_eq!(adapt(RawOrder::rest(raw), "JPY").customer_name.as_deref(), Some("Sato"));

        let mut raw = rest_fixture();
        raw["customer"] = json!({"first_name": " ", "last_name": ""});
        assert!(adapt(RawOrder::rest(raw), "JPY").customer_name.is_none());
    }

    #[test]
    fn test_malformed_money_and_quantity() {
        let mut raw = rest_fixture();
        raw["total_price"] = json!("n/a");
        raw["line_items"] = json!([{"title": "X", "quantity": -3, "price": {"bad": true}}]);
        let record = adapt(RawOrder::rest(raw), "JPY");
        assert_eq!(record.totals.total.value, Decimal::ZERO);
        assert_eq!(record.line_items.first().map(|i| i.quantity), Some(0));
        assert_eq!(
            record.line_items.first().map(|i| i.unit_price.value),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_quantity_parsing() {
        assert_eq!(quantity(Some(&json!(3))), 3);
        assert_eq!(quantity(Some(&json!("4"))), 4);
        assert_eq!(quantity(Some(&json!(2.7))), 2);
        assert_eq!(quantity(Some(&json!(-1))), 0);
        assert_eq!(quantity(Some(&json!(null))), 0);
        assert_eq!(quantity(None), 0);
    }

    #[test]
    fn test_missing_currency_uses_default() {
        let mut raw = rest_fixture();
        raw["currency"] = Value::Null;
        let record = adapt(RawOrder::rest(raw), "EUR");
        assert_eq!(record.totals.total.currency, "EUR");

        let mut raw = graphql_fixture();
        raw["totalPriceSet"] = json!({"presentmentMoney": {"amount": "10"}});
        let record = adapt(RawOrder::graphql(raw), "EUR");
        assert_eq!(record.totals.total.currency, "EUR");
        assert_eq!(record.totals.subtotal.currency, "JPY");
    }

    #[test]
    fn test_created_at_fallback() {
        let mut raw = rest_fixture();
        raw["processed_at"] = Value::Null;
        raw["created_at"] = json!("2024-03-31T10:00:00Z");
        assert_eq!(adapt(RawOrder::rest(raw), "JPY").timestamp, "2024-03-31T10:00:00Z");
    }

    #[test]
    fn test_rest_page_with_link_header() {
        let body = json!({"orders": [rest_fixture(), rest_fixture()]});
        let link = "<https://s.myshopify.com/admin/api/2024-01/orders.json?limit=2&page_info=nxt>; rel=\"next\"";
        let (records, info) =
            adapt_rest_page(Some(link), &body, "JPY").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(records.len(), 2);
        assert!(info.has_next_page);
        assert_eq!(info.end_cursor.as_deref(), Some("nxt"));
    }

    #[test]
    fn test_rest_page_without_orders_is_malformed() {
        let result = adapt_rest_page(None, &json!({"errors": "oops"}), "JPY");
        assert!(matches!(result, Err(ShopifyError::MalformedPayload(_))));
    }

    #[test]
    fn test_graphql_page_nodes() {
        let connection = json!({
            "nodes": [graphql_fixture()],
            "pageInfo": {"hasNextPage": true, "endCursor": "c1", "hasPreviousPage": false, "startCursor": "c0"}
        });
        let (records, info) =
            adapt_graphql_page(&connection, "JPY").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(records.len(), 1);
        assert_eq!(info.end_cursor.as_deref(), Some("c1"));
        assert!(info.has_next_page);
    }

    #[test]
    fn test_graphql_page_edges() {
        let connection = json!({
            "edges": [{"node": graphql_fixture()}, {"cursor": "x"}],
            "pageInfo": {"hasNextPage": false, "endCursor": null}
        });
        let (records, info) =
            adapt_graphql_page(&connection, "JPY").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(records.len(), 2);
        assert!(!info.has_next_page);
        assert!(info.end_cursor.is_none());
    }

    #[test]
    fn test_graphql_page_malformed() {
        let result = adapt_graphql_page(&json!({"pageInfo": {}}), "JPY");
        assert!(matches!(result, Err(ShopifyError::MalformedPayload(_))));
    }
}
