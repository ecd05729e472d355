//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - At least 32 characters, not a repeated pattern
//! - `DEVBURGER_API_URL` - Root URL of the DevBurger REST API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `DEVBURGER_LOG_JSON` - Emit JSON logs when truthy
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use devburger_core::config::{
    flag_env, optional_env, parse_env_or, parse_required_env, required_env, session_secret,
};
use secrecy::SecretString;
use url::Url;

pub use devburger_core::config::ConfigError;

/// Runtime settings for the storefront binary.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Interface to listen on.
    pub host: IpAddr,
    pub port: u16,
    /// Public origin, e.g. `https://devburger.com.br`.
    pub base_url: String,
    /// Never logged; `Debug` prints it redacted.
    pub session_secret: SecretString,
    /// Every catalog, account and order call goes here.
    pub api_url: Url,
    pub log_json: bool,
    /// Sentry is off when unset.
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Read the process environment, after merging a `.env` file when one exists.
    ///
    /// # Errors
    ///
    /// Fails on the first missing or unparsable variable, and on a weak
    /// session secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: parse_env_or("STOREFRONT_HOST", "127.0.0.1")?,
            port: parse_env_or("STOREFRONT_PORT", "3000")?,
            base_url: required_env("STOREFRONT_BASE_URL")?,
            session_secret: session_secret("STOREFRONT_SESSION_SECRET")?,
            api_url: parse_required_env("DEVBURGER_API_URL")?,
            log_json: flag_env("DEVBURGER_LOG_JSON"),
            sentry_dsn: optional_env("SENTRY_DSN"),
            sentry_environment: optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Address handed to the TCP listener.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Session cookies get `Secure` only behind HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: base_url.to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            api_url: "http://localhost:3001".parse().unwrap(),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        assert!(!config("http://localhost:3000").is_secure());
        assert!(config("https://devburger.com.br").is_secure());
    }

    #[test]
    fn test_debug_redacts_session_secret() {
        let mut config = config("http://localhost:3000");
        config.session_secret = SecretString::from("k7#Qm2!vX9@pL4$wR8^tY1&zN6*bC3%h");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("k7#Qm2!vX9@pL4$wR8^tY1&zN6*bC3%h"));
    }
}
