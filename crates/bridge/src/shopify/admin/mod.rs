//! Shopify Admin API client implementation.
//!
//! Customer operations use the Admin REST API; the checkout signup form
//! uses one fixed Admin GraphQL query with a hand-rolled envelope.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ShopifyAdminConfig;
use crate::shopify::ShopifyError;

use types::{
    Customer, CustomerEnvelope, CustomerSearchResponse, CustomerUpdate, CustomerUpdateEnvelope,
    MetaobjectsData, SignupForm,
};

/// Cache key for the checkout signup form (there is exactly one).
const FORM_CACHE_KEY: &str = "checkout_signup_form";

/// The fixed metaobject query behind `POST /fetch-metafields`.
const SIGNUP_FORM_QUERY: &str = r#"
    query GetCheckoutSignupForm {
        metaobjects(type: "checkout_sign_up_form", first: 1) {
            edges {
                node {
                    id
                    fields {
                        key
                        value
                    }
                }
            }
        }
    }
"#;

/// Current time in the RFC 3339 form Shopify expects for consent timestamps.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// GraphQL envelope
// =============================================================================

#[derive(Debug, Serialize)]
struct GraphQLRequest {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
}

impl<T> GraphQLResponse<T> {
    fn into_result(self) -> Result<T, ShopifyError> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        self.data
            .ok_or_else(|| ShopifyError::GraphQL(vec!["No data in response".to_string()]))
    }
}

// =============================================================================
// AdminClient
// =============================================================================

/// Client for the Shopify Admin API.
///
/// Provides customer search and update plus the checkout signup form
/// metaobject. The signup form is cached for 5 minutes.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    rest_base: String,
    graphql_endpoint: String,
    form_cache: Cache<String, Option<SignupForm>>,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &ShopifyAdminConfig) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Shopify-Access-Token",
            HeaderValue::from_str(config.admin_token.expose_secret())
                .map_err(|e| ShopifyError::InvalidToken(e.to_string()))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        let rest_base = format!(
            "https://{}/admin/api/{}",
            config.store, config.api_version
        );
        let graphql_endpoint = format!("{rest_base}/graphql.json");

        let form_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                rest_base,
                graphql_endpoint,
                form_cache,
            }),
        })
    }

    // =========================================================================
    // Customers (REST)
    // =========================================================================

    /// Find a customer by email address.
    ///
    /// Returns `None` when no customer matches; multiple matches return the
    /// first one, mirroring the search API's relevance ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-success
    /// status.
    #[instrument(skip(self, email))]
    pub async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Customer>, ShopifyError> {
        let url = format!(
            "{}/customers/search.json?query=email:{}",
            self.inner.rest_base,
            urlencoding::encode(email)
        );

        let response = self.inner.client.get(&url).send().await?;
        let body = Self::check_status(response).await?;

        let search: CustomerSearchResponse = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse customer search response"
            );
        })?;

        Ok(search.customers.into_iter().next())
    }

    /// Update a customer.
    ///
    /// The tag list in `update` fully replaces the customer's tags, so
    /// callers must merge beforehand.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or rejects the update.
    #[instrument(skip(self, update), fields(customer_id = update.id))]
    pub async fn update_customer(&self, update: &CustomerUpdate) -> Result<Customer, ShopifyError> {
        let url = format!("{}/customers/{}.json", self.inner.rest_base, update.id);

        let response = self
            .inner
            .client
            .put(&url)
            .json(&CustomerUpdateEnvelope { customer: update })
            .send()
            .await?;
        let body = Self::check_status(response).await?;

        let envelope: CustomerEnvelope = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse customer update response"
            );
        })?;

        debug!(customer_id = envelope.customer.id, "Customer updated");

        Ok(envelope.customer)
    }

    // =========================================================================
    // Checkout signup form (GraphQL)
    // =========================================================================

    /// Fetch the checkout signup form metaobject.
    ///
    /// Returns `None` when the store has no `checkout_sign_up_form`
    /// metaobject. Results (including the absent case) are cached for
    /// 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the query returns
    /// GraphQL errors.
    #[instrument(skip(self))]
    pub async fn checkout_signup_form(&self) -> Result<Option<SignupForm>, ShopifyError> {
        if let Some(form) = self.inner.form_cache.get(FORM_CACHE_KEY).await {
            debug!("Cache hit for signup form");
            return Ok(form);
        }

        let request = GraphQLRequest {
            query: SIGNUP_FORM_QUERY.to_string(),
            variables: None,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.graphql_endpoint)
            .json(&request)
            .send()
            .await?;
        let body = Self::check_status(response).await?;

        let response: GraphQLResponse<MetaobjectsData> =
            serde_json::from_str(&body).inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    body = %truncate(&body),
                    "Failed to parse metaobject query response"
                );
            })?;

        let data = response.into_result()?;
        let form = data
            .metaobjects
            .edges
            .into_iter()
            .next()
            .map(|edge| SignupForm::from_fields(edge.node.fields));

        self.inner
            .form_cache
            .insert(FORM_CACHE_KEY.to_string(), form.clone())
            .await;

        Ok(form)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Map rate limiting and non-success statuses to errors, returning the
    /// response body text otherwise.
    async fn check_status(response: reqwest::Response) -> Result<String, ShopifyError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        Ok(body)
    }
}

/// Truncate a response body for logs and error messages.
fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_response_with_data() {
        let response: GraphQLResponse<serde_json::Value> =
            serde_json::from_str(r#"{"data": {"ok": true}}"#).unwrap();
        let data = response.into_result().unwrap();
        assert_eq!(data["ok"], true);
    }

    #[test]
    fn test_graphql_response_with_errors() {
        let response: GraphQLResponse<serde_json::Value> = serde_json::from_str(
            r#"{"data": null, "errors": [{"message": "Throttled"}, {"message": "Other"}]}"#,
        )
        .unwrap();

        let err = response.into_result().unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Throttled; Other");
    }

    #[test]
    fn test_graphql_response_no_data_no_errors() {
        let response: GraphQLResponse<serde_json::Value> = serde_json::from_str("{}").unwrap();
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, ShopifyError::GraphQL(_)));
    }

    #[test]
    fn test_graphql_request_skips_absent_variables() {
        let request = GraphQLRequest {
            query: "query { shop { name } }".to_string(),
            variables: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("variables").is_none());
    }

    #[test]
    fn test_signup_form_query_targets_the_right_metaobject() {
        assert!(SIGNUP_FORM_QUERY.contains(r#"type: "checkout_sign_up_form""#));
        assert!(SIGNUP_FORM_QUERY.contains("first: 1"));
    }

    #[test]
    fn test_now_rfc3339_shape() {
        let now = now_rfc3339();
        // 2024-01-01T00:00:00.000Z
        assert!(now.ends_with('Z'));
        assert!(now.contains('T'));
    }

    #[test]
    fn test_truncate_long_body() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), 200);
        assert_eq!(truncate("short"), "short");
    }
}
