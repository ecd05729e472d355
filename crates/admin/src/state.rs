//! Shared handler state: settings, the API client and the rendered CSP.

use std::sync::Arc;

use devburger_api::{ApiClient, ApiError};

use crate::config::AdminConfig;
use crate::middleware::security_headers::content_security_policy;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
    csp: String,
}

impl AppState {
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let inner = AppStateInner {
            api: ApiClient::new(&config.api_url)?,
            csp: content_security_policy(&config.api_url),
            config,
        };
        Ok(Self { inner: Arc::new(inner) })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The DevBurger API client. Writes go out with the admin's own token.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn csp(&self) -> &str {
        &self.inner.csp
    }
}
