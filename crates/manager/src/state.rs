//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, PhoneApiClient};
use crate::config::ManagerConfig;
use crate::query::PhoneQueries;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the cached phone queries.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ManagerConfig,
    phones: PhoneQueries,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: ManagerConfig) -> Result<Self, ApiError> {
        let api = PhoneApiClient::new(&config.api)?;
        let phones = PhoneQueries::new(api, &config.cache);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, phones }),
        })
    }

    /// Get a reference to the manager configuration.
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    /// Get a reference to the cached phone queries.
    #[must_use]
    pub fn phones(&self) -> &PhoneQueries {
        &self.inner.phones
    }
}
