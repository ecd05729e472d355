//! Environment-variable helpers shared by the storefront and admin binaries.
//!
//! Both binaries read the same kinds of settings (bind address, API root,
//! session secret, Sentry). The lookups and secret checks live here so the
//! per-binary `config` modules only list which variables they read.

use std::collections::HashMap;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as a copy-pasted placeholder (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Read a required variable.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] if the variable is unset.
pub fn required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Read an optional variable. Empty values count as unset.
#[must_use]
pub fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read a variable and parse it, falling back to `default` when unset.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if the value (or the default) does
/// not parse.
pub fn parse_env_or<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = optional_env(key).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a required variable and parse it.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] if unset or
/// [`ConfigError::InvalidEnvVar`] if it does not parse.
pub fn parse_required_env<T>(key: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    required_env(key)?
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a variable as a truthy flag (`1`, `true`, `yes`, `on`).
#[must_use]
pub fn flag_env(key: &str) -> bool {
    optional_env(key).is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Read and validate a session secret.
///
/// The secret must be at least 32 characters, must not look like a
/// placeholder, and must have at least 3.3 bits of entropy per character.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] if unset or
/// [`ConfigError::InsecureSecret`] if it fails validation.
pub fn session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let secret = SecretString::from(required_env(key)?);
    validate_secret_strength(secret.expose_secret(), key)?;
    validate_session_secret_length(&secret, key)?;
    Ok(secret)
}

fn validate_session_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let len = secret.expose_secret().chars().count();
    if len < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {len})"),
        ));
    }
    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)] // secret lengths are tiny
    let len = total as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("aaaaaaa").abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_placeholder_rejected() {
        let err = validate_secret_strength("your-session-key-goes-right-here-ok", "TEST_VAR");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_low_entropy_rejected() {
        let err = validate_secret_strength(&"a".repeat(40), "TEST_VAR");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_strong_secret_accepted() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_session_secret_length() {
        let short = SecretString::from("k9$Lq2");
        assert!(validate_session_secret_length(&short, "TEST_SESSION").is_err());

        let long = SecretString::from("x".repeat(32));
        assert!(validate_session_secret_length(&long, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_missing_required_env() {
        let err = required_env("DEVBURGER_TEST_SURELY_UNSET_VAR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: DEVBURGER_TEST_SURELY_UNSET_VAR"
        );
    }

    #[test]
    fn test_parse_env_default() {
        let port: u16 = parse_env_or("DEVBURGER_TEST_SURELY_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);

        let err = parse_env_or::<u16>("DEVBURGER_TEST_SURELY_UNSET_PORT", "not-a-port");
        assert!(matches!(err, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
