//! Customer login, signup and logout.
//!
//! Login and registration go through the DevBurger API (`POST /sessions`,
//! `POST /users`). The returned user, including its bearer token, is kept in
//! the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use devburger_api::{ApiError, NewUser};
use devburger_core::{
    FieldErrors, Flash,
    forms::{LoginForm, RegisterForm},
};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Layout;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user, set_flash};
use crate::state::AppState;

pub const BAD_CREDENTIALS: &str = "Verifique seu e-mail e senha";
pub const EMAIL_TAKEN: &str = "E-mail já cadastrado! Faça login para continuar";
pub const REGISTERED: &str = "Cadastro efetuado com sucesso";
pub const SYSTEM_FAILURE: &str = "Falha no sistema! Tente novamente";

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub errors: FieldErrors,
    pub form_error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub name: String,
    pub email: String,
    pub errors: FieldErrors,
    pub form_error: Option<String>,
}

/// Re-render the login form with the submitted email and error messages.
async fn rerender_login(
    session: &Session,
    form: &LoginForm,
    errors: FieldErrors,
    form_error: Option<&str>,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        LoginTemplate {
            layout: Layout::load(session, None).await,
            email: form.email.clone(),
            errors,
            form_error: form_error.map(String::from),
        },
    )
        .into_response()
}

/// Re-render the registration form; passwords are never echoed back.
async fn rerender_register(
    session: &Session,
    form: &RegisterForm,
    errors: FieldErrors,
    form_error: Option<&str>,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        RegisterTemplate {
            layout: Layout::load(session, None).await,
            name: form.name.clone(),
            email: form.email.clone(),
            errors,
            form_error: form_error.map(String::from),
        },
    )
        .into_response()
}

pub async fn login_page(session: Session, OptionalAuth(user): OptionalAuth) -> LoginTemplate {
    LoginTemplate {
        layout: Layout::load(&session, user.as_ref()).await,
        email: String::new(),
        errors: FieldErrors::new(),
        form_error: None,
    }
}

/// Exchange credentials for an API token and greet the customer.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return rerender_login(&session, &form, errors, None).await,
    };

    let user = match state.api().login(input.email.as_str(), &input.password).await {
        Ok(user) => user,
        Err(ApiError::Unauthorized | ApiError::BadRequest(_) | ApiError::NotFound(_)) => {
            tracing::info!("Login rejected");
            return rerender_login(&session, &form, FieldErrors::new(), Some(BAD_CREDENTIALS))
                .await;
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            return rerender_login(&session, &form, FieldErrors::new(), Some(SYSTEM_FAILURE)).await;
        }
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to store customer in session: {e}");
        return rerender_login(&session, &form, FieldErrors::new(), Some(SYSTEM_FAILURE)).await;
    }

    set_sentry_user(&user);
    tracing::info!(user_id = %user.id, "Customer logged in");
    set_flash(&session, Flash::success(format!("Seja bem-vindo(a), {}!", user.name))).await;
    Redirect::to("/").into_response()
}

/// Display the registration page.
pub async fn register_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> RegisterTemplate {
    RegisterTemplate {
        layout: Layout::load(&session, user.as_ref()).await,
        name: String::new(),
        email: String::new(),
        errors: FieldErrors::new(),
        form_error: None,
    }
}

/// Create the account, then send the customer to log in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return rerender_register(&session, &form, errors, None).await,
    };

    let new_user = NewUser {
        name: input.name,
        email: input.email,
        password: input.password,
    };

    match state.api().register(&new_user).await {
        Ok(()) => {
            tracing::info!("Customer registered");
            set_flash(&session, Flash::success(REGISTERED)).await;
            Redirect::to("/auth/login").into_response()
        }
        Err(ApiError::Conflict(_)) => {
            rerender_register(&session, &form, FieldErrors::new(), Some(EMAIL_TAKEN)).await
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            rerender_register(&session, &form, FieldErrors::new(), Some(SYSTEM_FAILURE)).await
        }
    }
}

/// Sign out. Flushing the session empties the cart too.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/").into_response()
}
