//! Storefront error type and Sentry helpers.
//!
//! Most pages degrade instead of failing: an API outage renders the page
//! with a notice. Handlers that cannot degrade (cart fragments) return
//! [`Result`], and server-side failures are reported to Sentry on the way
//! out.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devburger_api::ApiError;
use thiserror::Error;

use crate::models::CurrentUser;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A product id the catalog does not know.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this is our fault (or the API's) rather than the client's.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Api(err) => !err.is_client_error(),
            Self::Session(_) => true,
            Self::NotFound(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Body text; never includes API or session internals.
    fn public_message(&self) -> String {
        match self {
            Self::NotFound(_) => self.to_string(),
            Self::Session(_) => "Internal server error".to_string(),
            Self::Api(ApiError::Unauthorized) => "Unauthorized".to_string(),
            Self::Api(ApiError::NotFound(_)) => "Not found".to_string(),
            Self::Api(_) => "External service error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), self.public_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Tag Sentry events with the signed-in customer.
pub fn set_sentry_user(user: &CurrentUser) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.to_string()),
            email: Some(user.email.to_string()),
            username: Some(user.name.clone()),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

/// Record a customer action as a Sentry breadcrumb.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let data = data
        .iter()
        .map(|(key, value)| ((*key).to_string(), serde_json::Value::String(value.clone())))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}
