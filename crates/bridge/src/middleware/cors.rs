//! CORS policy for the checkout extension.
//!
//! The checkout UI runs sandboxed on a CDN origin, so every endpoint must
//! answer preflights and carry `Access-Control-Allow-Origin` for exactly
//! that origin. The policy never uses a wildcard and never allows
//! credentials.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::BridgeConfig;

/// Build the CORS layer allowing the configured checkout extension origin.
///
/// Allows `POST` and `OPTIONS` with a `Content-Type` header, matching what
/// the extension sends.
#[must_use]
pub fn extension_cors(config: &BridgeConfig) -> CorsLayer {
    let allowed = config.extension_origin.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request| origin.as_bytes() == allowed.as_bytes(),
        ))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(600))
}
