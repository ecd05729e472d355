//! Customer email address.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why an email address was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {0} characters")]
    TooLong(usize),
    /// Not shaped like `local@domain.tld`.
    #[error("email is malformed")]
    Malformed,
}

/// A trimmed email address shaped like `local@domain.tld`.
///
/// This is the same loose check the login and registration forms apply in
/// the browser; the API remains the authority on whether an account exists.
///
/// ```
/// use devburger_core::Email;
///
/// assert!(Email::parse("cliente@devburger.com.br").is_ok());
/// assert!(Email::parse("cliente@localhost").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Validate and trim `input`.
    ///
    /// # Errors
    ///
    /// Returns an error for empty, overlong or malformed input.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let email = input.trim();

        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong(Self::MAX_LENGTH));
        }
        if !is_well_formed(email) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(email.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One `@`, no whitespace, a non-empty local part and a dotted domain
/// whose labels are all non-empty.
fn is_well_formed(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
