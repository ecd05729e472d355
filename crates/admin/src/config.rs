//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//! - `ADMIN_SESSION_SECRET` - At least 32 characters, not a repeated pattern
//! - `DEVBURGER_API_URL` - Root URL of the DevBurger REST API
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
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

/// Runtime settings for the admin binary.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Interface to listen on.
    pub host: IpAddr,
    pub port: u16,
    /// Public origin of the panel.
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

impl AdminConfig {
    /// Read the process environment, after merging a `.env` file when one exists.
    ///
    /// # Errors
    ///
    /// Fails on the first missing or unparsable variable, and on a weak
    /// session secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: parse_env_or("ADMIN_HOST", "127.0.0.1")?,
            port: parse_env_or("ADMIN_PORT", "3001")?,
            base_url: required_env("ADMIN_BASE_URL")?,
            session_secret: session_secret("ADMIN_SESSION_SECRET")?,
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

    #[test]
    fn test_socket_addr() {
        let config = AdminConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 3001,
            base_url: "https://admin.devburger.com.br".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            api_url: "http://localhost:3333".parse().unwrap(),
            log_json: true,
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3001");
        assert!(config.is_secure());
    }
}
