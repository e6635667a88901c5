//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend;
use crate::config::AppConfig;
use crate::geo::Geocoder;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    backend: backend::Client,
    geocoder: Geocoder,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be constructed from
    /// the configuration.
    pub fn new(config: AppConfig) -> Result<Self, backend::BackendError> {
        let backend = backend::Client::new(&config.backend)?;
        let geocoder = Geocoder::new(&config.geocoder);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                geocoder,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the backend row-store client.
    #[must_use]
    pub fn backend(&self) -> &backend::Client {
        &self.inner.backend
    }

    /// Get a reference to the reverse-geocoding client.
    #[must_use]
    pub fn geocoder(&self) -> &Geocoder {
        &self.inner.geocoder
    }
}
