//! Raw upstream order shapes.
//!
//! These mirror what Shopify actually sends, with every field optional and
//! decoded leniently: a field of the wrong type becomes its default instead of
//! failing the whole record. The adapter in [`super::conversions`] turns them
//! into canonical records.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a field, falling back to its default when the value has the wrong
/// shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list, dropping entries that are not objects of the right shape.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

// =============================================================================
// Shape A: GraphQL `orders` connection node
// =============================================================================

/// An order node from the GraphQL `orders` connection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphqlOrder {
    /// Order name (`#1001`).
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Global ID (`gid://shopify/Order/1`).
    #[serde(deserialize_with = "lenient")]
    pub id: Option<Value>,
    /// Processing timestamp.
    #[serde(deserialize_with = "lenient")]
    pub processed_at: Option<String>,
    /// Creation timestamp, used when `processedAt` is absent.
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<String>,
    /// Attached customer.
    #[serde(deserialize_with = "lenient")]
    pub customer: Option<GraphqlCustomer>,
    /// Financial status.
    #[serde(deserialize_with = "lenient")]
    pub display_financial_status: Option<String>,
    /// Fulfillment status.
    #[serde(deserialize_with = "lenient")]
    pub display_fulfillment_status: Option<String>,
    /// Line items wrapped in edges.
    #[serde(deserialize_with = "lenient")]
    pub line_items: GraphqlLineItemConnection,
    /// Grand total.
    #[serde(deserialize_with = "lenient")]
    pub total_price_set: Option<MoneyBag>,
    /// Subtotal.
    #[serde(deserialize_with = "lenient")]
    pub subtotal_price_set: Option<MoneyBag>,
    /// Total tax.
    #[serde(deserialize_with = "lenient")]
    pub total_tax_set: Option<MoneyBag>,
}

/// Customer as exposed on a GraphQL order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphqlCustomer {
    /// Full display name.
    #[serde(deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

/// `lineItems { edges { node } }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphqlLineItemConnection {
    /// Edges in upstream order.
    #[serde(deserialize_with = "lenient_seq")]
    pub edges: Vec<GraphqlLineItemEdge>,
}

/// A line item edge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphqlLineItemEdge {
    /// The wrapped line item.
    #[serde(deserialize_with = "lenient")]
    pub node: Option<GraphqlLineItem>,
}

/// A GraphQL line item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphqlLineItem {
    /// Product title.
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Quantity (number or numeric string).
    #[serde(deserialize_with = "lenient")]
    pub quantity: Option<Value>,
    /// Unit price before discounts.
    #[serde(deserialize_with = "lenient")]
    pub original_unit_price_set: Option<MoneyBag>,
}

/// A `MoneyBag` wrapper; only the presentment currency is used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoneyBag {
    /// Amount in the customer's presentment currency.
    #[serde(deserialize_with = "lenient")]
    pub presentment_money: Option<GraphqlMoney>,
}

/// `MoneyV2`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphqlMoney {
    /// Decimal amount, usually a string.
    #[serde(deserialize_with = "lenient")]
    pub amount: Option<Value>,
    /// ISO 4217 code.
    #[serde(deserialize_with = "lenient")]
    pub currency_code: Option<String>,
}

/// Relay `pageInfo` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphqlPageInfo {
    /// Whether more records follow.
    #[serde(deserialize_with = "lenient")]
    pub has_next_page: bool,
    /// Cursor of the last record.
    #[serde(deserialize_with = "lenient")]
    pub end_cursor: Option<String>,
}

// =============================================================================
// Shape B: REST `orders.json` record
// =============================================================================

/// An order from the REST `orders.json` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestOrder {
    /// Order name (`#1001`).
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Numeric ID.
    #[serde(deserialize_with = "lenient")]
    pub id: Option<Value>,
    /// Processing timestamp.
    #[serde(deserialize_with = "lenient")]
    pub processed_at: Option<String>,
    /// Creation timestamp, used when `processed_at` is absent.
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<String>,
    /// Attached customer.
    #[serde(deserialize_with = "lenient")]
    pub customer: Option<RestCustomer>,
    /// Financial status.
    #[serde(deserialize_with = "lenient")]
    pub financial_status: Option<String>,
    /// Fulfillment status.
    #[serde(deserialize_with = "lenient")]
    pub fulfillment_status: Option<String>,
    /// Flat line item list.
    #[serde(deserialize_with = "lenient_seq")]
    pub line_items: Vec<RestLineItem>,
    /// Grand total.
    #[serde(deserialize_with = "lenient")]
    pub total_price: Option<Value>,
    /// Subtotal.
    #[serde(deserialize_with = "lenient")]
    pub subtotal_price: Option<Value>,
    /// Total tax.
    #[serde(deserialize_with = "lenient")]
    pub total_tax: Option<Value>,
    /// Order currency, shared by every amount on the order.
    #[serde(deserialize_with = "lenient")]
    pub currency: Option<String>,
}

/// Customer embedded in a REST order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestCustomer {
    /// Given name.
    #[serde(deserialize_with = "lenient")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(deserialize_with = "lenient")]
    pub last_name: Option<String>,
}

/// A REST line item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestLineItem {
    /// Product title.
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Quantity.
    #[serde(deserialize_with = "lenient")]
    pub quantity: Option<Value>,
    /// Unit price as a decimal string.
    #[serde(deserialize_with = "lenient")]
    pub price: Option<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wrong_types_fall_back_to_defaults() {
        let order: RestOrder = serde_json::from_value(json!({
            "name": 1001,
            "customer": "not an object",
            "line_items": [{"title": "Tea", "quantity": 2}, "garbage", null],
            "currency": ["JPY"],
        }))
        .unwrap_or_default();

        assert_eq!(order.name, None);
        assert!(order.customer.is_none());
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.currency, None);
    }

    #[test]
    fn test_graphql_edges_tolerate_missing_nodes() {
        let order: GraphqlOrder = serde_json::from_value(json!({
            "name": "#1001",
            "lineItems": {"edges": [{"node": {"title": "Tea"}}, {}, {"node": 7}]},
        }))
        .unwrap_or_default();

        assert_eq!(order.name.as_deref(), Some("#1001"));
        assert_eq!(order.line_items.edges.len(), 3);
        assert!(order.line_items.edges.iter().skip(1).all(|e| e.node.is_none()));
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        let order: GraphqlOrder = serde_json::from_value(json!({})).unwrap_or_default();
        assert!(order.name.is_none());
        assert!(order.line_items.edges.is_empty());
        assert!(order.total_price_set.is_none());
    }
}
