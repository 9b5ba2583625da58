//! Authentication route handlers.
//!
//! Login posts the credentials to the backend and keeps the issued token in
//! the server-side session. Logout asks for confirmation first.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::LoginOutcome;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    OptionalSession, RequireSession, clear_current_session, set_current_session,
};
use crate::models::ApiSession;
use crate::state::AppState;

use super::{Notice, NoticeQuery, notice_href, redirect_with, render};

pub const MSG_EMPTY_CREDENTIALS: &str = "Username dan password tidak boleh kosong!";
pub const MSG_LOGIN_FAILED: &str = "Terjadi kesalahan saat login!";
pub const MSG_LOGIN_SUCCESS: &str = "Anda berhasil login!";
pub const MSG_LOGOUT_SUCCESS: &str = "Anda berhasil logout";
pub const MSG_LOGOUT_CANCELLED: &str = "Logout dibatalkan";

/// Login form data.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Query of the logout confirmation.
#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
    /// Page to return to on cancel.
    pub from: Option<String>,
}

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    notices: Vec<Notice>,
}

/// Logout confirmation template.
#[derive(Template)]
#[template(path = "auth/logout.html")]
struct LogoutTemplate {
    username: String,
    cancel_href: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", get(logout_page).post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(
    OptionalSession(existing): OptionalSession,
    Query(notices): Query<NoticeQuery>,
) -> Response {
    if existing.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    render(&LoginTemplate {
        notices: notices.into_notices(),
    })
    .into_response()
}

/// Authenticate against the backend.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Ok(
            redirect_with("/auth/login", &Notice::error(MSG_EMPTY_CREDENTIALS)).into_response(),
        );
    }

    let password = SecretString::from(form.password);
    match state.api().login(username, &password).await {
        Ok(LoginOutcome::Authenticated(token)) => {
            set_current_session(&session, &ApiSession::new(username, token)).await?;
            set_sentry_user(username);
            tracing::info!(username, "Operator logged in");
            Ok(redirect_with("/dashboard", &Notice::success(MSG_LOGIN_SUCCESS)).into_response())
        }
        Ok(LoginOutcome::Rejected(message)) => {
            tracing::info!(username, reason = %message, "Login rejected");
            Ok(redirect_with("/auth/login", &Notice::error(message)).into_response())
        }
        Err(e) => {
            tracing::warn!(username, error = %e, "Login failed");
            Ok(redirect_with("/auth/login", &Notice::error(MSG_LOGIN_FAILED)).into_response())
        }
    }
}

/// Ask before logging out.
///
/// GET /auth/logout
async fn logout_page(
    RequireSession(api_session): RequireSession,
    Query(query): Query<LogoutQuery>,
) -> Response {
    let back = query
        .from
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/dashboard".to_string());

    render(&LogoutTemplate {
        username: api_session.username,
        cancel_href: notice_href(&back, &Notice::info(MSG_LOGOUT_CANCELLED)),
    })
    .into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip(session))]
async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_session(&session).await?;
    clear_sentry_user();
    tracing::info!("Operator logged out");
    Ok(redirect_with("/auth/login", &Notice::success(MSG_LOGOUT_SUCCESS)))
}

/// Only same-site absolute paths are valid return targets.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
