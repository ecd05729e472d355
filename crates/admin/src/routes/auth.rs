//! Admin authentication route handlers.
//!
//! Admins sign in with the same `POST /sessions` call customers use; only
//! users carrying the `admin` flag get a session here.

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use devburger_api::ApiError;
use devburger_core::{FieldErrors, forms::LoginForm};
use tower_sessions::Session;
use tracing::instrument;

use super::render;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_admin, set_current_admin, take_flash};
use crate::state::AppState;
use crate::{filters, models::CurrentAdmin};

pub const BAD_CREDENTIALS: &str = "Verifique seu e-mail e senha";
pub const NOT_AN_ADMIN: &str = "Acesso restrito a administradores";
pub const SYSTEM_FAILURE: &str = "Falha no sistema! Tente novamente";

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub errors: FieldErrors,
    pub form_error: Option<String>,
}

fn login_form(status: StatusCode, email: &str, errors: FieldErrors, form_error: Option<&str>) -> Response {
    (
        status,
        render(&LoginTemplate {
            email: email.to_string(),
            errors,
            form_error: form_error.map(String::from),
        }),
    )
        .into_response()
}

/// Display the login page. A pending flash (e.g. session expiry) shows as
/// the form error.
pub async fn login_page(session: Session) -> Response {
    let notice = take_flash(&session).await.map(|flash| flash.message);
    login_form(StatusCode::OK, "", FieldErrors::new(), notice.as_deref())
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let rejected = |errors: FieldErrors, form_error: Option<&str>| {
        login_form(StatusCode::UNPROCESSABLE_ENTITY, &form.email, errors, form_error)
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return rejected(errors, None),
    };

    let user: CurrentAdmin = match state.api().login(input.email.as_str(), &input.password).await {
        Ok(user) => user,
        Err(ApiError::Unauthorized | ApiError::BadRequest(_) | ApiError::NotFound(_)) => {
            tracing::info!("Admin login rejected");
            return rejected(FieldErrors::new(), Some(BAD_CREDENTIALS));
        }
        Err(e) => {
            tracing::error!("Admin login failed: {e}");
            return rejected(FieldErrors::new(), Some(SYSTEM_FAILURE));
        }
    };

    if !user.admin {
        tracing::warn!(user_id = %user.id, "Non-admin login attempt");
        return rejected(FieldErrors::new(), Some(NOT_AN_ADMIN));
    }

    if let Err(e) = set_current_admin(&session, &user).await {
        tracing::error!("Failed to set session: {e}");
        return rejected(FieldErrors::new(), Some(SYSTEM_FAILURE));
    }

    set_sentry_user(&user);
    tracing::info!(user_id = %user.id, "Admin logged in");
    Redirect::to("/orders").into_response()
}

/// Handle logout.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/auth/login")
}
