//! Authentication extractors for the dashboard.
//!
//! Handlers receive the operator's backend session through
//! [`RequireSession`] instead of reading it from ambient state.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{ApiSession, session_keys};

/// Extractor that requires a logged-in operator.
///
/// If nobody is logged in, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(session): RequireSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", session.username)
/// }
/// ```
pub struct RequireSession(pub ApiSession);

/// Error returned when a session is required but missing.
pub enum SessionRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// The session layer is not installed.
    MissingLayer,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::MissingLayer => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SessionRejection::MissingLayer)?;

        let api_session: ApiSession = session
            .get(session_keys::API_SESSION)
            .await
            .ok()
            .flatten()
            .ok_or(SessionRejection::RedirectToLogin)?;

        Ok(Self(api_session))
    }
}

/// Extractor that optionally gets the logged-in operator.
///
/// Used by the login page to skip the form for an existing session.
pub struct OptionalSession(pub Option<ApiSession>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let api_session = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<ApiSession>(session_keys::API_SESSION)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(api_session))
    }
}

/// Store the backend session after a successful login.
///
/// The session id is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_session(
    session: &Session,
    api_session: &ApiSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::API_SESSION, api_session).await
}

/// Remove the backend session (logout).
///
/// Flushes the whole session so the cookie is invalidated too.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_session(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
