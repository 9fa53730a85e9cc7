//! External service clients.
//!
//! # Services
//!
//! - `omnisend` - Omnisend contact API (email-marketing upsert)

pub mod omnisend;

pub use omnisend::{OmnisendClient, OmnisendError};
