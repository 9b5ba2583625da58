//! CLI command implementations.

pub mod gates;
pub mod traffic;

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use lalin_admin::api::{ApiError, LalinApiClient, LoginOutcome};
use lalin_admin::config::{ApiConfig, ConfigError};
use lalin_core::GateValidationError;

use crate::ConnectionArgs;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Username or password not supplied.
    #[error("Missing credentials: set LALIN_USERNAME and LALIN_PASSWORD or pass --username/--password")]
    MissingCredentials,

    /// The backend refused the credentials.
    #[error("Login rejected: {0}")]
    LoginRejected(String),

    /// Backend request failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Gate input did not validate.
    #[error("Invalid gate: {0}")]
    Validation(#[from] GateValidationError),

    /// Connection settings are malformed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A destructive command ran without `--yes`.
    #[error("Refusing to {0} without --yes")]
    NotConfirmed(&'static str),
}

/// Log in with the supplied credentials and return an authorized client.
///
/// # Errors
///
/// Returns `CliError` if credentials are missing, the URL is invalid or the
/// backend rejects the login.
pub async fn connect(args: &ConnectionArgs) -> Result<LalinApiClient, CliError> {
    let username = args
        .username
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or(CliError::MissingCredentials)?;
    let password = args
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| SecretString::from(p.to_string()))
        .ok_or(CliError::MissingCredentials)?;

    let config = ApiConfig::new(&args.api_url, Duration::from_secs(args.timeout_secs))?;
    let client = LalinApiClient::new(&config)?;

    match client.login(username, &password).await? {
        LoginOutcome::Authenticated(token) => {
            tracing::debug!(username, backend = %config.base_url, "Logged in");
            Ok(client.with_token(token))
        }
        LoginOutcome::Rejected(message) => Err(CliError::LoginRejected(message)),
    }
}
