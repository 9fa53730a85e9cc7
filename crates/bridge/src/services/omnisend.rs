//! Omnisend API client for contact management.
//!
//! Provides the email-marketing half of the checkout subscription flow:
//! an idempotent contact upsert. Creating a contact that already exists
//! (`409 Conflict`) is folded into the update path, so both paths converge
//! to the same end state: subscribed, with the union of old and new tags.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use checkout_bridge_core::TagSet;

use crate::config::OmnisendConfig;
use crate::shopify::admin::now_rfc3339;

/// Omnisend API base URL.
const BASE_URL: &str = "https://api.omnisend.com/v3";

/// Errors that can occur when interacting with the Omnisend API.
#[derive(Debug, Error)]
pub enum OmnisendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },

    /// A contact reported as existing could not be fetched back.
    #[error("Contact not found for email: {0}")]
    ContactNotFound(String),

    /// Failed to parse a response or build the client.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Outcome of a contact upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A new contact was created.
    Created,
    /// An existing contact was updated with merged tags.
    Updated,
}

/// Omnisend API client for contact management.
#[derive(Clone)]
pub struct OmnisendClient {
    inner: Arc<OmnisendClientInner>,
}

struct OmnisendClientInner {
    client: reqwest::Client,
}

impl OmnisendClient {
    /// Create a new Omnisend API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &OmnisendConfig) -> Result<Self, OmnisendError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "X-API-KEY",
            HeaderValue::from_str(config.api_key.expose_secret())
                .map_err(|e| OmnisendError::Parse(format!("Invalid API key format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(OmnisendClientInner { client }),
        })
    }

    /// Subscribe a contact, creating or updating as needed.
    ///
    /// Tries to create the contact as subscribed. When Omnisend answers
    /// `409 Conflict` the contact already exists, so it is fetched back,
    /// its tags merged with the requested ones, and patched.
    ///
    /// # Errors
    ///
    /// Returns error if any API request fails, or
    /// [`OmnisendError::ContactNotFound`] if the contact vanished between
    /// the conflicting create and the fetch.
    #[instrument(skip(self, first_name, last_name, tags), fields(email = %email))]
    pub async fn subscribe(
        &self,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        tags: &TagSet,
    ) -> Result<SubscribeOutcome, OmnisendError> {
        let payload = ContactPayload::subscribed(email, first_name, last_name, tags.to_vec());

        if self.create_contact(&payload).await? {
            debug!("Contact created");
            return Ok(SubscribeOutcome::Created);
        }

        // 409: the contact exists. Merge tags and patch.
        let contact = self
            .find_contact_by_email(email)
            .await?
            .ok_or_else(|| OmnisendError::ContactNotFound(email.to_string()))?;

        let mut merged = TagSet::from(contact.tags);
        merged.merge(tags);

        let update = ContactPayload::subscribed(email, first_name, last_name, merged.to_vec());
        self.update_contact(&contact.contact_id, &update).await?;

        debug!(contact_id = %contact.contact_id, "Existing contact updated");
        Ok(SubscribeOutcome::Updated)
    }

    /// Find a contact by email address.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn find_contact_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Contact>, OmnisendError> {
        let url = format!(
            "{BASE_URL}/contacts?email={}&limit=1",
            urlencoding::encode(email)
        );

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OmnisendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let list: ContactListResponse = response
            .json()
            .await
            .map_err(|e| OmnisendError::Parse(e.to_string()))?;

        Ok(list.contacts.into_iter().next())
    }

    /// Create a contact.
    ///
    /// Returns `true` on success and `false` when the contact already
    /// exists (`409 Conflict`).
    async fn create_contact(&self, payload: &ContactPayload) -> Result<bool, OmnisendError> {
        let url = format!("{BASE_URL}/contacts");

        let response = self.inner.client.post(&url).json(payload).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::CONFLICT {
            return Ok(false);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OmnisendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(true)
    }

    /// Update an existing contact.
    async fn update_contact(
        &self,
        contact_id: &str,
        payload: &ContactPayload,
    ) -> Result<(), OmnisendError> {
        let url = format!("{BASE_URL}/contacts/{contact_id}");

        let response = self.inner.client.patch(&url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OmnisendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// Contact payload sent on create and update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    identifiers: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

impl ContactPayload {
    /// Payload for a contact subscribing to email marketing right now.
    fn subscribed(
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            identifiers: vec![Identifier {
                id_type: "email",
                id: email.to_string(),
                channels: Channels {
                    email: ChannelStatus {
                        status: "subscribed",
                        status_date: now_rfc3339(),
                    },
                },
            }],
            first_name: first_name.map(String::from),
            last_name: last_name.map(String::from),
            tags,
        }
    }
}

#[derive(Debug, Serialize)]
struct Identifier {
    #[serde(rename = "type")]
    id_type: &'static str,
    id: String,
    channels: Channels,
}

#[derive(Debug, Serialize)]
struct Channels {
    email: ChannelStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatus {
    status: &'static str,
    status_date: String,
}

/// A contact resource from the Omnisend API.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(rename = "contactID")]
    pub contact_id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Wrapper for contact list responses.
#[derive(Debug, Deserialize)]
struct ContactListResponse {
    #[serde(default)]
    contacts: Vec<Contact>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_payload_shape() {
        let payload = ContactPayload::subscribed(
            "user@example.com",
            Some("Ada"),
            None,
            vec!["glow".to_string(), "post-checkout-signup".to_string()],
        );
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["identifiers"][0]["type"], "email");
        assert_eq!(json["identifiers"][0]["id"], "user@example.com");
        assert_eq!(
            json["identifiers"][0]["channels"]["email"]["status"],
            "subscribed"
        );
        assert!(
            json["identifiers"][0]["channels"]["email"]["statusDate"]
                .as_str()
                .unwrap()
                .ends_with('Z')
        );
        assert_eq!(json["firstName"], "Ada");
        // Omitted rather than null
        assert!(json.get("lastName").is_none());
        assert_eq!(json["tags"][1], "post-checkout-signup");
    }

    #[test]
    fn test_contact_payload_skips_empty_tags() {
        let payload = ContactPayload::subscribed("user@example.com", None, None, vec![]);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn test_contact_deserialization() {
        let contact: Contact = serde_json::from_value(serde_json::json!({
            "contactID": "5d6b3bd4e3dd4f00012b0a1a",
            "email": "user@example.com",
            "tags": ["glow"]
        }))
        .unwrap();

        assert_eq!(contact.contact_id, "5d6b3bd4e3dd4f00012b0a1a");
        assert_eq!(contact.tags, vec!["glow"]);
    }

    #[test]
    fn test_contact_tags_default_to_empty() {
        let contact: Contact = serde_json::from_value(serde_json::json!({
            "contactID": "5d6b3bd4e3dd4f00012b0a1a",
            "email": null
        }))
        .unwrap();

        assert!(contact.tags.is_empty());
    }

    #[test]
    fn test_contact_list_tolerates_missing_contacts() {
        let list: ContactListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.contacts.is_empty());
    }
}
