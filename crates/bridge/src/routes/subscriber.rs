//! Subscriber check and Shopify subscription route handlers.
//!
//! `POST /check-subscriber` serves two requests from the checkout UI with
//! one body shape: a subscription status check (the default), and the
//! Shopify half of the subscribe flow when `action` is `"subscribe"`.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use checkout_bridge_core::{Email, TagSet};

use crate::error::AppError;
use crate::shopify::{CustomerUpdate, EmailMarketingConsentInput, ShopifyError};
use crate::state::AppState;

/// Request body sent by the checkout UI.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// `"subscribe"` triggers the subscribe flow; anything else (or
    /// nothing) is a status check.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Order the signup came from. Logged for traceability only.
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Response for a status check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberStatus {
    pub customer_id: Option<u64>,
    pub is_subscribed: bool,
    pub customer_exists: bool,
}

/// Response for the subscribe flow.
///
/// `success: false` with a 200 is a soft failure the checkout UI renders
/// inline; transport-level failures surface as error statuses instead.
#[derive(Debug, Serialize)]
pub struct SubscribeResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

/// Check subscription status, or subscribe when requested.
///
/// POST /check-subscriber
#[instrument(skip(state, request), fields(order_id = request.order_id.as_deref().unwrap_or("")))]
pub async fn check_or_subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscriberRequest>,
) -> Result<Response, AppError> {
    let raw = request
        .email
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    if raw.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }
    let email =
        Email::parse(&raw).map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;

    if request.action.as_deref() == Some("subscribe") {
        let result = subscribe(&state, &email, request).await?;
        Ok(Json(result).into_response())
    } else {
        let status = check_status(&state, &email).await?;
        Ok(Json(status).into_response())
    }
}

/// Look up the customer and report their marketing consent.
async fn check_status(state: &AppState, email: &Email) -> Result<SubscriberStatus, AppError> {
    let customer = state.shopify().find_customer_by_email(email.as_str()).await?;

    Ok(customer.map_or(
        SubscriberStatus {
            customer_id: None,
            is_subscribed: false,
            customer_exists: false,
        },
        |customer| SubscriberStatus {
            customer_id: Some(customer.id),
            is_subscribed: customer.is_subscribed(),
            customer_exists: true,
        },
    ))
}

/// Subscribe an existing Shopify customer: merge the signup tag into their
/// tags and mark them opted in.
async fn subscribe(
    state: &AppState,
    email: &Email,
    request: SubscriberRequest,
) -> Result<SubscribeResult, AppError> {
    let Some(customer) = state.shopify().find_customer_by_email(email.as_str()).await? else {
        tracing::info!(email = %email, "No Shopify customer to subscribe");
        return Ok(SubscribeResult {
            success: false,
            message: "Customer not found in Shopify".to_string(),
            status: None,
        });
    };

    let mut tags = TagSet::parse(&customer.tags);
    tags.insert(&state.config().signup_tag);

    let update = CustomerUpdate {
        id: customer.id,
        // Names from the checkout form win; keep existing values otherwise
        first_name: request.first_name.or(customer.first_name),
        last_name: request.last_name.or(customer.last_name),
        tags: tags.to_string(),
        email_marketing_consent: EmailMarketingConsentInput::subscribed_now(),
    };

    match state.shopify().update_customer(&update).await {
        Ok(_) => {
            tracing::info!(email = %email, customer_id = customer.id, "Customer subscribed and tagged");
            Ok(SubscribeResult {
                success: true,
                message: "Customer subscribed in Shopify and tagged successfully".to_string(),
                status: Some("subscribed"),
            })
        }
        // Shopify rejected the update; the UI shows this as a soft failure
        Err(ShopifyError::Api { status, message }) => {
            tracing::warn!(
                email = %email,
                customer_id = customer.id,
                status,
                message = %message,
                "Failed to update Shopify subscription"
            );
            Ok(SubscribeResult {
                success: false,
                message: "Failed to update Shopify customer".to_string(),
                status: None,
            })
        }
        Err(e) => Err(e.into()),
    }
}
