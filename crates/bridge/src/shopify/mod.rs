//! Shopify Admin API client.
//!
//! # Architecture
//!
//! - Customer search and update go through the Admin REST API
//! - The checkout signup form metaobject goes through the Admin GraphQL API
//!   with a hand-rolled request/response envelope (one fixed query does not
//!   warrant schema codegen)
//! - The signup form response is cached via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use checkout_bridge::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify)?;
//!
//! if let Some(customer) = client.find_customer_by_email("user@example.com").await? {
//!     println!("{} is subscribed: {}", customer.id, customer.is_subscribed());
//! }
//! ```

pub mod admin;

pub use admin::AdminClient;
pub use admin::types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// REST API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<String>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The access token is not a valid header value.
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

fn format_graphql_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }
    errors.join("; ")
}
