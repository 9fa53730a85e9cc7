//! Core types for Checkout Bridge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod tags;

pub use email::{Email, EmailError};
pub use tags::TagSet;
