//! API client errors.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when calling the DevBurger REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or rejected credentials (401).
    #[error("Unauthorized")]
    Unauthorized,

    /// The API rejected the input (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists (409).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid base URL or path.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this is a client-side rejection rather than an outage.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::BadRequest(_) | Self::NotFound(_) | Self::Conflict(_)
        )
    }

    /// Build an error from a non-success response.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = error_message(body);
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized,
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            code => Self::Status {
                status: code,
                message,
            },
        }
    }
}

/// The API answers errors as `{"error": "..."}` or `{"error": ["...", ...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    One { error: String },
    Many { error: Vec<String> },
}

/// Extract a readable message from an error response body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::One { error }) => error,
        Ok(ErrorBody::Many { error }) => error.join("; "),
        Err(_) => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, r#"{"error":"User already exists"}"#),
            ApiError::Conflict(msg) if msg == "User already exists"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::Status { status: 500, message } if message == "boom"
        ));
    }

    #[test]
    fn test_error_list_is_joined() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":["name is a required field","price must be positive"]}"#,
        );
        assert_eq!(
            err.to_string(),
            "Bad request: name is a required field; price must be positive"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_long_plain_body_is_truncated() {
        let body = "x".repeat(500);
        let ApiError::Status { message, .. } =
            ApiError::from_status(StatusCode::BAD_GATEWAY, &body)
        else {
            panic!("expected status error");
        };
        assert_eq!(message.len(), 200);
    }
}
