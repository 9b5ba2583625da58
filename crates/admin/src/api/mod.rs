//! Client for the toll-gate backend.
//!
//! Wraps the backend's HTTP interface for login, gate CRUD and traffic
//! retrieval by date.
//!
//! # Endpoints
//!
//! ```text
//! POST   /auth/login              {username, password} -> {status, token, message}
//! GET    /gerbangs                gate collection
//! POST   /gerbangs                create gate
//! PUT    /gerbangs                update gate
//! DELETE /gerbangs                {id, IdCabang}
//! GET    /lalins?tanggal=<date>   traffic collection of one day
//! ```
//!
//! Collections come wrapped as `{"data": {"rows": {"rows": [...]}}}`.

mod types;

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use lalin_core::{GateKey, GateRecord, TrafficRecord};

use crate::config::ApiConfig;
use crate::models::SessionToken;

use types::{ErrorBody, ListEnvelope, LoginRequest, LoginResponse};

/// Message used when the backend rejects a login without saying why.
const DEFAULT_REJECTION: &str = "Username atau password salah";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or build a URL.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Short message for user notifications.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(e) if e.is_timeout() => "Request to the backend timed out".to_string(),
            Self::Http(_) => "Backend is unreachable".to_string(),
            Self::Parse(message) => message.clone(),
        }
    }
}

/// Result of a login attempt that reached the backend.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials accepted.
    Authenticated(SessionToken),
    /// Credentials refused; carries the backend's message.
    Rejected(String),
}

/// Toll-gate backend client.
///
/// Cheap to clone. A clone made with [`with_token`](Self::with_token) sends
/// `Authorization: Bearer <token>` on every request.
#[derive(Clone)]
pub struct LalinApiClient {
    inner: Arc<LalinApiClientInner>,
    token: Option<SessionToken>,
}

struct LalinApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl LalinApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("lalin-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(LalinApiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
            token: None,
        })
    }

    /// A client that authenticates as the given session.
    #[must_use]
    pub fn with_token(&self, token: SessionToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: Some(token),
        }
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Log in with a username and password.
    ///
    /// A body with `status: false` is a rejection whatever the HTTP status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend is unreachable or answers with
    /// something that is not a login response.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, ApiError> {
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        let response = self
            .request(Method::POST, "/auth/login")?
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<LoginResponse>(&text) {
            Ok(LoginResponse {
                status: true,
                token: Some(token),
                ..
            }) if status.is_success() && !token.is_empty() => {
                tracing::info!("Backend accepted login");
                Ok(LoginOutcome::Authenticated(SessionToken::new(token)))
            }
            Ok(LoginResponse { status: true, .. }) if status.is_success() => Err(
                ApiError::Parse("Login succeeded without a token".to_string()),
            ),
            Ok(LoginResponse {
                status: false,
                message,
                ..
            }) => {
                tracing::info!(http_status = status.as_u16(), "Backend rejected login");
                Ok(LoginOutcome::Rejected(
                    message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
                ))
            }
            _ => Err(error_from_body(status.as_u16(), &text)),
        }
    }

    /// Fetch every gate.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn list_gates(&self) -> Result<Vec<GateRecord>, ApiError> {
        let envelope: ListEnvelope = self.fetch(self.request(Method::GET, "/gerbangs")?).await?;
        let gates: Vec<GateRecord> = envelope.into_rows();
        tracing::debug!(count = gates.len(), "Fetched gates");
        Ok(gates)
    }

    /// Create a gate.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses or cannot be reached.
    #[instrument(skip(self, gate), fields(gate_id = %gate.id))]
    pub async fn create_gate(&self, gate: &GateRecord) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/gerbangs", gate).await?;
        tracing::info!("Gate created");
        Ok(())
    }

    /// Update a gate, matched by its id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses or cannot be reached.
    #[instrument(skip(self, gate), fields(gate_id = %gate.id))]
    pub async fn update_gate(&self, gate: &GateRecord) -> Result<(), ApiError> {
        self.send_json(Method::PUT, "/gerbangs", gate).await?;
        tracing::info!("Gate updated");
        Ok(())
    }

    /// Delete the gate with the given key.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses or cannot be reached.
    #[instrument(skip(self), fields(gate_id = %key.id, branch_id = %key.branch_id))]
    pub async fn delete_gate(&self, key: GateKey) -> Result<(), ApiError> {
        self.send_json(Method::DELETE, "/gerbangs", &key).await?;
        tracing::info!("Gate deleted");
        Ok(())
    }

    /// Fetch the traffic records of one day.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is malformed.
    #[instrument(skip(self), fields(tanggal = %date))]
    pub async fn list_traffic(&self, date: NaiveDate) -> Result<Vec<TrafficRecord>, ApiError> {
        let mut url = self.url("/lalins")?;
        url.query_pairs_mut()
            .append_pair("tanggal", &date.format("%Y-%m-%d").to_string());

        let envelope: ListEnvelope = self.fetch(self.authorize(self.inner.client.get(url))).await?;
        let records: Vec<TrafficRecord> = envelope.into_rows();
        tracing::debug!(count = records.len(), "Fetched traffic");
        Ok(records)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{path}", self.inner.base_url);
        Url::parse(&raw).map_err(|e| ApiError::Parse(format!("Invalid URL {raw}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.url(path)?;
        Ok(self.authorize(self.inner.client.request(method, url)))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self.request(method, path)?.json(body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(self.parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    /// Parse error response from the backend.
    async fn parse_error(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let error = error_from_body(status, &text);
        tracing::warn!(status, error = %error, "Backend request failed");
        error
    }
}

/// Build an `Api` error, preferring the body's `message` field.
fn error_from_body(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.chars().take(200).collect())
        })
        .unwrap_or_else(|| format!("Request failed with status code {status}"));

    ApiError::Api { status, message }
}

impl std::fmt::Debug for LalinApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LalinApiClient")
            .field("base_url", &self.inner.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}
