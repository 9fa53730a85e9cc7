//! Omnisend contact subscription route handler.
//!
//! The email-marketing half of the checkout subscribe flow: upserts a
//! contact as subscribed, merging tags when the contact already exists.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use checkout_bridge_core::{Email, TagSet};

use crate::state::AppState;

/// Contact subscription request from the checkout UI.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Order the signup came from. Logged for traceability only.
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Response for a contact subscription.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Subscribe a contact in Omnisend.
///
/// POST /subscribe-contact
///
/// Creating a contact that already exists is not a failure: the 409 from
/// Omnisend routes into the update path, which merges the contact's
/// existing tags with the requested ones.
#[instrument(skip(state, form), fields(order_id = form.order_id.as_deref().unwrap_or("")))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(form): Json<ContactRequest>,
) -> impl IntoResponse {
    let email = form.email.trim().to_lowercase();

    if Email::parse(&email).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ContactResponse {
                success: false,
                message: Some("Please enter a valid email address.".to_string()),
            }),
        );
    }

    let Some(client) = state.omnisend() else {
        tracing::error!("Omnisend not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ContactResponse {
                success: false,
                message: Some("Service temporarily unavailable.".to_string()),
            }),
        );
    };

    let tags: TagSet = form.tags.iter().collect();

    match client
        .subscribe(
            &email,
            form.first_name.as_deref(),
            form.last_name.as_deref(),
            &tags,
        )
        .await
    {
        Ok(outcome) => {
            tracing::info!(email = %email, ?outcome, "Contact subscribed");
            (
                StatusCode::OK,
                Json(ContactResponse {
                    success: true,
                    message: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!(email = %email, error = %e, "Failed to subscribe contact");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse {
                    success: false,
                    message: Some("Something went wrong. Please try again.".to_string()),
                }),
            )
        }
    }
}
