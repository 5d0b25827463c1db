//! Shopify Admin API client for reading orders.
//!
//! Orders can be listed over either of the two Admin API protocols:
//! - REST (`orders.json`), paginated through the `Link` response header
//! - GraphQL (`orders` connection), paginated through an inline `pageInfo`
//!
//! Both produce canonical [`OrderRecord`](receipt_desk_core::OrderRecord)s via
//! the [`conversions`] adapter.
//!
//! # Example
//!
//! ```rust,ignore
//! use receipt_desk_admin::shopify::ShopifyClient;
//!
//! let client = ShopifyClient::new(&config.shopify)?;
//!
//! // First REST page of 100 orders
//! let (orders, page_info) = client.rest_orders_page(None, 100).await?;
//!
//! // Follow the cursor
//! if let Some(cursor) = page_info.end_cursor.as_deref() {
//!     let (more, _) = client.rest_orders_page(Some(cursor), 100).await?;
//! }
//! ```

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::{Protocol, ShopifyConfig};

pub mod conversions;
mod graphql;
pub mod link_header;
pub mod raw;
mod rest;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response body lacks the expected record list.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

const MAX_ERROR_BODY: usize = 512;

/// Shopify Admin API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    store: String,
    api_version: String,
    access_token: SecretString,
    protocol: Protocol,
    shop_currency: String,
}

impl ShopifyClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                client,
                store: config.store.clone(),
                api_version: config.api_version.clone(),
                access_token: config.access_token.clone(),
                protocol: config.protocol,
                shop_currency: config.shop_currency.clone(),
            }),
        })
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// Protocol used for order listing.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.inner.protocol
    }

    /// Currency assumed when a record carries no currency code.
    #[must_use]
    pub fn shop_currency(&self) -> &str {
        &self.inner.shop_currency
    }

    /// Absolute URL of an Admin API resource.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "https://{}/admin/api/{}/{}",
            self.inner.store, self.inner.api_version, path
        )
    }

    /// Authenticate and send a request, mapping error statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ShopifyError> {
        let response = request
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        check_status(response).await
    }
}

/// Turn non-success statuses into typed errors.
// Retry-After is a small non-negative number of seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
async fn check_status(response: Response) -> Result<Response, ShopifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map_or(2, |secs| secs.ceil().max(0.0) as u64);
        return Err(ShopifyError::RateLimited(retry_after));
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ShopifyError::Unauthorized(
            "Invalid or expired access token".to_string(),
        ));
    }

    let url = response.url().path().to_string();
    if status == StatusCode::NOT_FOUND {
        return Err(ShopifyError::NotFound(url));
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    Err(ShopifyError::Status {
        status: status.as_u16(),
        body,
    })
}
