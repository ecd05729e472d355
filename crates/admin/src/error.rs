//! Admin error type.
//!
//! Form handlers re-render on validation and API failures, so this mostly
//! covers broken uploads and session store failures.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devburger_api::ApiError;
use thiserror::Error;

use crate::models::CurrentAdmin;

#[derive(Debug, Error)]
pub enum AppError {
    /// DevBurger API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Upload body could not be read.
    #[error("Bad upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let reportable = match &self {
            Self::Session(_) => true,
            Self::Api(e) => !e.is_client_error(),
            Self::Multipart(_) => false,
        };
        if reportable {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Api(ApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Multipart(e) => e.status(),
        };

        let message = match &self {
            Self::Session(_) => "Internal server error".to_string(),
            Self::Api(_) => "External service error".to_string(),
            Self::Multipart(e) => e.body_text(),
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Tag Sentry events with the signed-in admin. The panel is internal, so
/// the email is included.
pub fn set_sentry_user(admin: &CurrentAdmin) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin.id.to_string()),
            email: Some(admin.email.to_string()),
            username: Some(admin.name.clone()),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}
