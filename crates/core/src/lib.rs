//! Checkout Bridge Core - Shared types library.
//!
//! This crate provides common types used across the Checkout Bridge
//! components:
//! - `bridge` - The checkout extension API proxy binary
//! - `integration-tests` - Live API tests against a running bridge
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails and tag lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
