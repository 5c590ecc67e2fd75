//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::visitor::VisitorRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend client, configuration and the visitor registry.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    visitors: VisitorRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let visitors = VisitorRegistry::new(api.clone(), config.visitor_idle);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                visitors,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the visitor registry.
    #[must_use]
    pub fn visitors(&self) -> &VisitorRegistry {
        &self.inner.visitors
    }
}
