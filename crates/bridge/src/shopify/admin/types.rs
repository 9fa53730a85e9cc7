//! Wire types for the Shopify Admin API.

use serde::{Deserialize, Serialize};

// =============================================================================
// Customers (REST)
// =============================================================================

/// A customer record as returned by the Admin REST API.
///
/// Only the fields the bridge touches are modeled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Numeric customer ID.
    pub id: u64,
    /// Customer email address.
    pub email: Option<String>,
    /// Customer first name.
    pub first_name: Option<String>,
    /// Customer last name.
    pub last_name: Option<String>,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: String,
    /// Email marketing consent, absent for customers who never opted in
    /// or out.
    pub email_marketing_consent: Option<EmailMarketingConsent>,
}

impl Customer {
    /// Returns `true` if the customer has opted into email marketing.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.email_marketing_consent
            .as_ref()
            .is_some_and(|consent| consent.state == "subscribed")
    }
}

/// Email marketing consent state on a customer record.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailMarketingConsent {
    /// Consent state (`subscribed`, `not_subscribed`, `unsubscribed`, ...).
    pub state: String,
    /// How the customer opted in.
    pub opt_in_level: Option<String>,
    /// When the consent state last changed (RFC 3339).
    pub consent_updated_at: Option<String>,
}

/// Response of `GET customers/search.json`.
#[derive(Debug, Deserialize)]
pub struct CustomerSearchResponse {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// Response envelope of `PUT customers/{id}.json`.
#[derive(Debug, Deserialize)]
pub struct CustomerEnvelope {
    pub customer: Customer,
}

// =============================================================================
// Customer update (REST request body)
// =============================================================================

/// Fields sent in a customer update.
#[derive(Debug, Serialize)]
pub struct CustomerUpdate {
    /// Customer ID (Shopify requires it in the body as well as the URL).
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Full replacement tag list, comma-separated.
    pub tags: String,
    pub email_marketing_consent: EmailMarketingConsentInput,
}

/// Email marketing consent sent in a customer update.
#[derive(Debug, Serialize)]
pub struct EmailMarketingConsentInput {
    pub state: &'static str,
    pub opt_in_level: &'static str,
    pub consent_updated_at: String,
}

impl EmailMarketingConsentInput {
    /// Consent for a customer subscribing right now via the checkout form.
    #[must_use]
    pub fn subscribed_now() -> Self {
        Self {
            state: "subscribed",
            opt_in_level: "single_opt_in",
            consent_updated_at: crate::shopify::admin::now_rfc3339(),
        }
    }
}

/// Request envelope of `PUT customers/{id}.json`.
#[derive(Debug, Serialize)]
pub struct CustomerUpdateEnvelope<'a> {
    pub customer: &'a CustomerUpdate,
}

// =============================================================================
// Checkout signup form (GraphQL)
// =============================================================================

/// The checkout signup form content, flattened from the
/// `checkout_sign_up_form` metaobject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub heading: Option<String>,
    pub body_text: Option<String>,
    pub button_link: Option<String>,
    pub button_text: Option<String>,
}

impl SignupForm {
    /// Flatten metaobject `key`/`value` fields into the known form fields.
    ///
    /// Unknown keys are ignored; absent keys stay `None`.
    #[must_use]
    pub fn from_fields(fields: Vec<MetaobjectField>) -> Self {
        let mut form = Self::default();
        for field in fields {
            match field.key.as_str() {
                "heading" => form.heading = field.value,
                "body_text" => form.body_text = field.value,
                "button_link" => form.button_link = field.value,
                "button_text" => form.button_text = field.value,
                _ => {}
            }
        }
        form
    }
}

/// `data` payload of the checkout signup form query.
#[derive(Debug, Deserialize)]
pub struct MetaobjectsData {
    pub metaobjects: MetaobjectConnection,
}

#[derive(Debug, Deserialize)]
pub struct MetaobjectConnection {
    #[serde(default)]
    pub edges: Vec<MetaobjectEdge>,
}

#[derive(Debug, Deserialize)]
pub struct MetaobjectEdge {
    pub node: MetaobjectNode,
}

#[derive(Debug, Deserialize)]
pub struct MetaobjectNode {
    pub id: String,
    #[serde(default)]
    pub fields: Vec<MetaobjectField>,
}

/// A single `key`/`value` pair on a metaobject.
#[derive(Debug, Deserialize)]
pub struct MetaobjectField {
    pub key: String,
    pub value: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn field(key: &str, value: &str) -> MetaobjectField {
        MetaobjectField {
            key: key.to_string(),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_customer_is_subscribed() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": 42,
            "email": "user@example.com",
            "first_name": "Ada",
            "last_name": null,
            "tags": "glow, vip",
            "email_marketing_consent": {
                "state": "subscribed",
                "opt_in_level": "single_opt_in",
                "consent_updated_at": "2024-01-01T00:00:00Z"
            }
        }))
        .unwrap();

        assert!(customer.is_subscribed());
        assert_eq!(customer.tags, "glow, vip");
    }

    #[test]
    fn test_customer_without_consent_is_not_subscribed() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": 42,
            "email": "user@example.com",
            "email_marketing_consent": null
        }))
        .unwrap();

        assert!(!customer.is_subscribed());
        assert!(customer.tags.is_empty());
    }

    #[test]
    fn test_customer_unsubscribed_state() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": 42,
            "email_marketing_consent": { "state": "unsubscribed" }
        }))
        .unwrap();

        assert!(!customer.is_subscribed());
    }

    #[test]
    fn test_search_response_tolerates_missing_customers() {
        let response: CustomerSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.customers.is_empty());
    }

    #[test]
    fn test_customer_update_serialization() {
        let update = CustomerUpdate {
            id: 42,
            first_name: Some("Ada".to_string()),
            last_name: None,
            tags: "glow, post-checkout-signup".to_string(),
            email_marketing_consent: EmailMarketingConsentInput {
                state: "subscribed",
                opt_in_level: "single_opt_in",
                consent_updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            },
        };

        let json = serde_json::to_value(CustomerUpdateEnvelope { customer: &update }).unwrap();

        assert_eq!(json["customer"]["id"], 42);
        assert_eq!(json["customer"]["first_name"], "Ada");
        // Omitted rather than null, so Shopify keeps the existing value
        assert!(json["customer"].get("last_name").is_none());
        assert_eq!(json["customer"]["tags"], "glow, post-checkout-signup");
        assert_eq!(
            json["customer"]["email_marketing_consent"]["state"],
            "subscribed"
        );
        assert_eq!(
            json["customer"]["email_marketing_consent"]["opt_in_level"],
            "single_opt_in"
        );
    }

    #[test]
    fn test_signup_form_from_fields() {
        let form = SignupForm::from_fields(vec![
            field("heading", "Stay in the loop"),
            field("body_text", "Get 10% off your next order."),
            field("button_link", "https://example.com/signup"),
            field("button_text", "Sign up"),
            field("unrelated", "ignored"),
        ]);

        assert_eq!(form.heading.as_deref(), Some("Stay in the loop"));
        assert_eq!(form.body_text.as_deref(), Some("Get 10% off your next order."));
        assert_eq!(form.button_link.as_deref(), Some("https://example.com/signup"));
        assert_eq!(form.button_text.as_deref(), Some("Sign up"));
    }

    #[test]
    fn test_signup_form_missing_fields_stay_none() {
        let form = SignupForm::from_fields(vec![field("heading", "Stay in the loop")]);

        assert_eq!(form.heading.as_deref(), Some("Stay in the loop"));
        assert!(form.body_text.is_none());
        assert!(form.button_link.is_none());
        assert!(form.button_text.is_none());
    }

    #[test]
    fn test_metaobjects_response_shape() {
        let data: MetaobjectsData = serde_json::from_value(serde_json::json!({
            "metaobjects": {
                "edges": [{
                    "node": {
                        "id": "gid://shopify/Metaobject/1",
                        "fields": [
                            { "key": "heading", "value": "Stay in the loop" },
                            { "key": "body_text", "value": null }
                        ]
                    }
                }]
            }
        }))
        .unwrap();

        let node = &data.metaobjects.edges[0].node;
        assert_eq!(node.id, "gid://shopify/Metaobject/1");
        assert_eq!(node.fields.len(), 2);
        assert!(node.fields[1].value.is_none());
    }
}
