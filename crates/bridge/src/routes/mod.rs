//! HTTP route handlers for the bridge.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health             - Health check
//!
//! # Checkout extension API (JSON, CORS-restricted to the extension origin)
//! POST /check-subscriber   - Subscription status check, or Shopify
//!                            subscribe when action == "subscribe"
//! POST /fetch-metafields   - Checkout signup form content
//! POST /subscribe-contact  - Omnisend contact upsert
//! ```
//!
//! All extension endpoints are POST-only; preflight `OPTIONS` requests are
//! answered by the CORS layer and anything else gets a 405.

pub mod contacts;
pub mod metafields;
pub mod subscriber;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create all routes for the bridge.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check-subscriber", post(subscriber::check_or_subscribe))
        .route("/fetch-metafields", post(metafields::fetch))
        .route("/subscribe-contact", post(contacts::subscribe))
}
