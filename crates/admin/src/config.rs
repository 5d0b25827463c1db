//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com, or just your-store)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token with `read_orders` scope
//!
//! ## Optional
//! - `RECEIPT_DESK_HOST` - Bind address (default: 127.0.0.1)
//! - `RECEIPT_DESK_PORT` - Listen port (default: 3002)
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-01)
//! - `SHOPIFY_PROTOCOL` - `rest` or `graphql` (default: rest)
//! - `SHOPIFY_TIMEOUT_SECS` - Per-request upstream timeout (default: 30)
//! - `SHOP_CURRENCY` - Currency for amounts without a code (default: JPY)
//! - `ORDERS_PAGE_SIZE` - Orders per displayed page, 1-250 (default: 100)
//! - `ORDERS_BATCH_SIZE` - Orders per upstream request, 1-250 (default: page size)
//! - `RECEIPT_LOCALE` - Money formatting locale (default: ja-JP)
//! - `RECEIPT_ISSUER_NAME` - Shop name printed on receipts
//! - `RECEIPT_ISSUER_ADDRESS` - Issuer address lines separated by `|`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use receipt_desk_core::{Locale, ReceiptIssuer};
use secrecy::SecretString;
use thiserror::Error;

const MAX_SHOPIFY_PAGE_SIZE: u32 = 250;
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which Admin API protocol lists orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    /// `orders.json` with `Link` header cursors.
    #[default]
    Rest,
    /// `orders` connection with relay cursors.
    Graphql,
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "graphql" | "gql" => Ok(Self::Graphql),
            other => Err(format!("expected rest or graphql, got {other:?}")),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rest => "rest",
            Self::Graphql => "graphql",
        })
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Order listing and receipt settings
    pub listing: ListingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Protocol used to list orders
    pub protocol: Protocol,
    /// Per-request timeout
    pub timeout: Duration,
    /// Currency assumed for amounts that carry no code
    pub shop_currency: String,
}

impl fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("protocol", &self.protocol)
            .field("timeout", &self.timeout)
            .field("shop_currency", &self.shop_currency)
            .finish()
    }
}

/// How orders are paged and how receipts are printed.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Orders per displayed page
    pub page_size: usize,
    /// Orders requested per upstream call
    pub batch_size: u32,
    /// Money formatting locale
    pub locale: Locale,
    /// Issuer block printed on receipts
    pub issuer: Option<ReceiptIssuer>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE as usize,
            batch_size: DEFAULT_PAGE_SIZE,
            locale: Locale::default(),
            issuer: None,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the access token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AdminConfig::from_env`].
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(env);

        let host = env
            .or_default("RECEIPT_DESK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("RECEIPT_DESK_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("RECEIPT_DESK_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("RECEIPT_DESK_PORT".to_string(), e.to_string()))?;

        let shopify = ShopifyConfig::from_env(&env)?;
        let listing = ListingConfig::from_env(&env)?;

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            shopify,
            listing,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let access_token = env.required("SHOPIFY_ACCESS_TOKEN")?;
        validate_not_placeholder(&access_token, "SHOPIFY_ACCESS_TOKEN")?;

        let protocol = env
            .or_default("SHOPIFY_PROTOCOL", "rest")
            .parse::<Protocol>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPIFY_PROTOCOL".to_string(), e))?;
        let timeout_secs = env
            .or_default("SHOPIFY_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            store: normalize_store(&env.required("SHOPIFY_STORE")?),
            api_version: env.or_default("SHOPIFY_API_VERSION", "2024-01"),
            access_token: SecretString::from(access_token),
            protocol,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            shop_currency: env.or_default("SHOP_CURRENCY", "JPY").to_ascii_uppercase(),
        })
    }
}

impl ListingConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let page_size = env
            .optional("ORDERS_PAGE_SIZE")
            .map_or(Ok(DEFAULT_PAGE_SIZE), |v| parse_page_size("ORDERS_PAGE_SIZE", &v))?;
        let batch_size = env
            .optional("ORDERS_BATCH_SIZE")
            .map_or(Ok(page_size), |v| parse_page_size("ORDERS_BATCH_SIZE", &v))?;
        let locale = env
            .or_default("RECEIPT_LOCALE", Locale::default().as_str())
            .parse::<Locale>()
            .map_err(|e| ConfigError::InvalidEnvVar("RECEIPT_LOCALE".to_string(), e.to_string()))?;

        let issuer = env
            .optional("RECEIPT_ISSUER_NAME")
            .filter(|name| !name.trim().is_empty())
            .map(|name| ReceiptIssuer {
                name: name.trim().to_string(),
                address_lines: env
                    .optional("RECEIPT_ISSUER_ADDRESS")
                    .map(|lines| {
                        lines
                            .split('|')
                            .map(str::trim)
                            .filter(|line| !line.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            });

        Ok(Self {
            page_size: page_size as usize,
            batch_size,
            locale,
            issuer,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup shared by the section loaders.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Accept `shop`, `shop.myshopify.com` or `https://shop.myshopify.com/`.
fn normalize_store(raw: &str) -> String {
    let store = raw
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    if store.contains('.') {
        store.to_string()
    } else {
        format!("{store}.myshopify.com")
    }
}

fn parse_page_size(key: &str, value: &str) -> Result<u32, ConfigError> {
    let size = value
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if (1..=MAX_SHOPIFY_PAGE_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 1 and {MAX_SHOPIFY_PAGE_SIZE} (got {size})"),
        ))
    }
}

/// Reject tokens copied unchanged from a sample `.env`.
fn validate_not_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }
    Ok(())
}
