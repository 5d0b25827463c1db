//! GraphQL Admin API transport.

use receipt_desk_core::{OrderRecord, UpstreamPageInfo};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::conversions::{RawOrder, adapt, adapt_graphql_page};
use super::{GraphQLError, ShopifyClient, ShopifyError};

const ORDER_FIELDS: &str = r"
    name
    id
    processedAt
    createdAt
    customer { displayName }
    displayFinancialStatus
    displayFulfillmentStatus
    lineItems(first: 250) {
        edges {
            node {
                title
                quantity
                originalUnitPriceSet { presentmentMoney { amount currencyCode } }
            }
        }
    }
    totalPriceSet { presentmentMoney { amount currencyCode } }
    subtotalPriceSet { presentmentMoney { amount currencyCode } }
    totalTaxSet { presentmentMoney { amount currencyCode } }
";

fn orders_query() -> String {
    format!(
        r"query GetOrders($first: Int!, $after: String) {{
    orders(first: $first, after: $after, sortKey: PROCESSED_AT, reverse: true) {{
        nodes {{ {ORDER_FIELDS} }}
        pageInfo {{ hasNextPage endCursor hasPreviousPage startCursor }}
    }}
}}"
    )
}

fn order_query() -> String {
    format!(
        r"query GetOrder($id: ID!) {{
    order(id: $id) {{ {ORDER_FIELDS} }}
}}"
    )
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<RawGraphQLError>,
}

#[derive(Debug, Deserialize)]
struct RawGraphQLError {
    message: String,
    #[serde(default)]
    path: Vec<Value>,
}

impl ShopifyClient {
    /// POST a query and return its `data` object.
    async fn execute(&self, query: String, variables: Value) -> Result<Value, ShopifyError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("graphql.json"))
            .json(&json!({ "query": query, "variables": variables }));
        let response = self.send(request).await?;

        let text = response.text().await?;
        let response: GraphQLResponse = serde_json::from_str(&text)?;

        if !response.errors.is_empty() {
            return Err(ShopifyError::GraphQL(
                response
                    .errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path,
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            ShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    /// Fetch one batch of orders through the `orders` connection, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns a transport or GraphQL error, or `MalformedPayload` when the
    /// connection carries no record list.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn graphql_orders_page(
        &self,
        cursor: Option<&str>,
        first: u32,
    ) -> Result<(Vec<OrderRecord>, UpstreamPageInfo), ShopifyError> {
        let data = self
            .execute(orders_query(), json!({ "first": first, "after": cursor }))
            .await?;

        let connection = data.get("orders").ok_or_else(|| {
            ShopifyError::MalformedPayload("response has no orders connection".to_string())
        })?;
        adapt_graphql_page(connection, self.shop_currency())
    }

    /// Fetch a single order. Numeric ids are expanded to order GIDs.
    ///
    /// # Errors
    ///
    /// Returns a transport or GraphQL error.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn graphql_order(&self, id: &str) -> Result<Option<OrderRecord>, ShopifyError> {
        let data = self
            .execute(order_query(), json!({ "id": order_gid(id) }))
            .await?;

        Ok(match data.get("order") {
            Some(order @ Value::Object(_)) => {
                Some(adapt(RawOrder::graphql(order.clone()), self.shop_currency()))
            }
            _ => None,
        })
    }
}

fn order_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("gid://shopify/Order/{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_gid() {
        assert_eq!(order_gid("5001"), "gid://shopify/Order/5001");
        assert_eq!(order_gid("gid://shopify/Order/5001"), "gid://shopify/Order/5001");
    }

    #[test]
    fn test_orders_query_shape() {
        let query = orders_query();
        assert!(query.contains("sortKey: PROCESSED_AT, reverse: true"));
        assert!(query.contains("after: $after"));
        assert!(query.contains("pageInfo { hasNextPage endCursor"));
        assert!(query.contains("presentmentMoney"));
    }

    #[test]
    fn test_response_errors_decode() {
        let response: GraphQLResponse = serde_json::from_value(json!({
            "errors": [{"message": "Throttled", "path": ["orders"]}]
        }))
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
    }
}
