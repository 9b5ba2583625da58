//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, LalinApiClient};
use crate::config::AdminConfig;
use crate::models::ApiSession;

/// Application state shared across all handlers.
///
/// Holds only immutable configuration and the backend client; per-request
/// data is never stored here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: LalinApiClient,
}

impl AppState {
    /// Build application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the backend HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = LalinApiClient::new(&config.api)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Unauthenticated backend client (login only).
    #[must_use]
    pub fn api(&self) -> &LalinApiClient {
        &self.inner.api
    }

    /// Backend client acting for a logged-in operator.
    #[must_use]
    pub fn api_for(&self, session: &ApiSession) -> LalinApiClient {
        self.inner.api.with_token(session.token.clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish()
    }
}
