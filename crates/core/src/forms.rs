//! Form validation shared by the storefront and admin login pages.
//!
//! Validation never stops at the first problem: every field is checked and
//! each failing field gets one message, so a page can show all of them next
//! to their inputs at once.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::Email;

/// Minimum password length accepted by the API.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const INVALID_EMAIL: &str = "Digite um e-mail válido";
pub const PASSWORD_TOO_SHORT: &str = "A senha deve ter pelo menos 6 caracteres";
pub const NAME_REQUIRED: &str = "O nome é obrigatório";
pub const PASSWORDS_DIFFER: &str = "As senhas devem ser iguais";

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submitted login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A login form that passed validation.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: Email,
    pub password: String,
}

impl LoginForm {
    /// Check the email shape and password length.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<LoginInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);

        match email {
            Some(email) if errors.is_empty() => Ok(LoginInput {
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Submitted registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

/// A registration form that passed validation.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl RegisterForm {
    /// Check name, email, password length and confirmation.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<RegisterInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", NAME_REQUIRED);
        }
        let email = check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.confirm_password != self.password {
            errors.add("confirmPassword", PASSWORDS_DIFFER);
        }

        match email {
            Some(email) if errors.is_empty() => Ok(RegisterInput {
                name: name.to_string(),
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

fn check_email(raw: &str, errors: &mut FieldErrors) -> Option<Email> {
    Email::parse(raw)
        .inspect_err(|_| errors.add("email", INVALID_EMAIL))
        .ok()
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password", PASSWORD_TOO_SHORT);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            email: " ana@devburger.com ".to_string(),
            password: "123456".to_string(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.email.as_str(), "ana@devburger.com");
    }

    #[test]
    fn test_login_reports_every_field() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL));
        assert_eq!(errors.get("password"), Some(PASSWORD_TOO_SHORT));
    }

    #[test]
    fn test_register_mismatched_confirmation() {
        let form = RegisterForm {
            name: "Ana".to_string(),
            email: "ana@devburger.com".to_string(),
            password: "123456".to_string(),
            confirm_password: "654321".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("confirmPassword"), Some(PASSWORDS_DIFFER));
        assert!(!errors.has("password"));
    }

    #[test]
    fn test_register_requires_name() {
        let form = RegisterForm {
            name: "   ".to_string(),
            email: "ana@devburger.com".to_string(),
            password: "123456".to_string(),
            confirm_password: "123456".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some(NAME_REQUIRED));
    }

    #[test]
    fn test_register_valid_trims_name() {
        let form = RegisterForm {
            name: " Ana Souza ".to_string(),
            email: "ana@devburger.com".to_string(),
            password: "segredo".to_string(),
            confirm_password: "segredo".to_string(),
        };
        assert_eq!(form.validate().unwrap().name, "Ana Souza");
    }

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add("price", "first");
        errors.add("price", "second");
        assert_eq!(errors.get("price"), Some("first"));
        assert!(!errors.is_empty());
    }
}
