//! Checkout signup form content route handler.
//!
//! The checkout UI fetches its copy (heading, body, button) from a
//! `checkout_sign_up_form` metaobject so merchants can edit it without a
//! deploy. The bridge flattens the metaobject fields into a fixed shape.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::shopify::SignupForm;
use crate::state::AppState;

/// Response wrapper: `{ "metafields": { ... } }`.
#[derive(Debug, Serialize)]
pub struct MetafieldsResponse {
    pub metafields: CheckoutFormFields,
}

/// The flattened signup form fields.
///
/// Absent fields serialize as explicit `null`s; the UI checks each key.
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFormFields {
    pub heading: Option<String>,
    pub body_text: Option<String>,
    pub button_link: Option<String>,
    pub button_text: Option<String>,
}

impl From<SignupForm> for CheckoutFormFields {
    fn from(form: SignupForm) -> Self {
        Self {
            heading: form.heading,
            body_text: form.body_text,
            button_link: form.button_link,
            button_text: form.button_text,
        }
    }
}

/// Fetch the checkout signup form content.
///
/// POST /fetch-metafields
///
/// The request body is ignored; the endpoint is a POST only because the
/// sandboxed extension cannot attach its payload to a GET.
#[instrument(skip(state))]
pub async fn fetch(State(state): State<AppState>) -> Result<Json<MetafieldsResponse>, AppError> {
    let form = state.shopify().checkout_signup_form().await?;

    // A store without the metaobject gets all-null fields, not an error
    let metafields = form.map(CheckoutFormFields::from).unwrap_or_default();

    Ok(Json(MetafieldsResponse { metafields }))
}
