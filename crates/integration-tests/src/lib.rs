//! Integration tests for Checkout Bridge.
//!
//! These tests run against a live bridge with real Shopify (and optionally
//! Omnisend) credentials, so they are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the bridge
//! cargo run -p checkout-bridge
//!
//! # Run the live tests against it
//! cargo test -p checkout-bridge-integration-tests -- --ignored
//! ```
//!
//! The bridge location defaults to `http://localhost:3000` and can be
//! overridden with `BRIDGE_BASE_URL`.

/// Base URL for the bridge under test (configurable via environment).
#[must_use]
pub fn bridge_base_url() -> String {
    std::env::var("BRIDGE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// An email address that will not match any Shopify customer or Omnisend
/// contact.
#[must_use]
pub fn unknown_email() -> String {
    format!("bridge-test-{}@example.com", uuid::Uuid::new_v4().simple())
}
