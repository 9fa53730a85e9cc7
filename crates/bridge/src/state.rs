//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::services::omnisend::OmnisendClient;
use crate::services::OmnisendError;
use crate::shopify::{AdminClient, ShopifyError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("shopify client: {0}")]
    Shopify(#[from] ShopifyError),
    #[error("omnisend client: {0}")]
    Omnisend(#[from] OmnisendError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the outbound API clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BridgeConfig,
    shopify: AdminClient,
    omnisend: Option<OmnisendClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either outbound client fails to build (e.g., a
    /// credential is not a valid header value).
    pub fn new(config: BridgeConfig) -> Result<Self, StateInitError> {
        let shopify = AdminClient::new(&config.shopify)?;
        let omnisend = config
            .omnisend
            .as_ref()
            .map(OmnisendClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                omnisend,
            }),
        })
    }

    /// Get a reference to the bridge configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Get a reference to the Omnisend client, if configured.
    #[must_use]
    pub fn omnisend(&self) -> Option<&OmnisendClient> {
        self.inner.omnisend.as_ref()
    }
}
