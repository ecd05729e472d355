//! Shared handler state: settings, the API client and the rendered CSP.

use std::sync::Arc;

use devburger_api::{ApiClient, ApiError};

use crate::config::StorefrontConfig;
use crate::middleware::security_headers::content_security_policy;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    csp: String,
}

impl AppState {
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let inner = AppStateInner {
            api: ApiClient::new(&config.api_url)?,
            csp: content_security_policy(&config.api_url),
            config,
        };
        Ok(Self { inner: Arc::new(inner) })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Shared client; the catalog cache lives inside it.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn csp(&self) -> &str {
        &self.inner.csp
    }
}
