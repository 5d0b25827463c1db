//! REST `orders.json` transport.

use receipt_desk_core::{OrderRecord, UpstreamPageInfo};
use serde_json::Value;
use tracing::instrument;

use super::conversions::{RawOrder, adapt, adapt_rest_page};
use super::{ShopifyClient, ShopifyError};

impl ShopifyClient {
    /// Fetch one batch of orders over REST.
    ///
    /// The first call filters `status=any` so closed and cancelled orders
    /// are listed too. Follow-up calls send only `limit` and `page_info`;
    /// Shopify rejects any other filter next to a cursor.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or `MalformedPayload` when the body has no
    /// `orders` list.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn rest_orders_page(
        &self,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<(Vec<OrderRecord>, UpstreamPageInfo), ShopifyError> {
        let limit = limit.to_string();
        let query: Vec<(&str, &str)> = match cursor {
            Some(cursor) => vec![("limit", limit.as_str()), ("page_info", cursor)],
            None => vec![("limit", limit.as_str()), ("status", "any")],
        };

        let request = self
            .inner
            .client
            .get(self.endpoint("orders.json"))
            .query(&query);
        let response = self.send(request).await?;

        let link = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;

        adapt_rest_page(link.as_deref(), &body, self.shop_currency())
    }

    /// Fetch a single order by id over REST.
    ///
    /// Accepts a bare numeric id or an order GID. Returns `Ok(None)` when
    /// Shopify reports 404.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or `MalformedPayload` when the body has no
    /// `order` object.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn rest_order(&self, id: &str) -> Result<Option<OrderRecord>, ShopifyError> {
        let id = id.rsplit('/').next().unwrap_or(id);
        let request = self
            .inner
            .client
            .get(self.endpoint(&format!("orders/{id}.json")));

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(ShopifyError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let text = response.text().await?;
        let mut body: Value = serde_json::from_str(&text)?;
        let order = match body.get_mut("order").map(Value::take) {
            Some(order @ Value::Object(_)) => order,
            _ => {
                return Err(ShopifyError::MalformedPayload(
                    "response has no order object".to_string(),
                ));
            }
        };

        Ok(Some(adapt(RawOrder::rest(order), self.shop_currency())))
    }
}
