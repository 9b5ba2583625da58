//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target a local backend.
//!
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the dashboard (default: `http://<host>:<port>`)
//! - `ADMIN_STATIC_DIR` - Directory served under `/static` (default: crates/admin/static)
//! - `LALIN_API_URL` - Toll-gate backend base URL (default: <http://localhost:8080/api>)
//! - `LALIN_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `LALIN_DEFAULT_DATE` - Date shown before one is picked (default: 2023-11-01)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use url::Url;

/// Default toll-gate backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default date of the dashboard and report screens.
pub const DEFAULT_REPORT_DATE: &str = "2023-11-01";

const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
///
/// Every variable has a default, so only malformed values fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// Directory with the stylesheet
    pub static_dir: PathBuf,
    /// Toll-gate backend configuration
    pub api: ApiConfig,
    /// Date used when the request does not pick one
    pub default_date: NaiveDate,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Toll-gate backend client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build a backend configuration, validating the URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is
    /// not http(s).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("LALIN_API_URL".to_string(), e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "LALIN_API_URL".to_string(),
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let host = env
            .or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = env
            .optional("ADMIN_BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"));
        let static_dir = PathBuf::from(env.or_default("ADMIN_STATIC_DIR", "crates/admin/static"));

        let timeout_secs = env
            .or_default("LALIN_API_TIMEOUT_SECS", &DEFAULT_API_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LALIN_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let api = ApiConfig::new(
            &env.or_default("LALIN_API_URL", DEFAULT_API_URL),
            Duration::from_secs(timeout_secs),
        )?;

        let default_date = NaiveDate::parse_from_str(
            &env.or_default("LALIN_DEFAULT_DATE", DEFAULT_REPORT_DATE),
            "%Y-%m-%d",
        )
        .map_err(|e| ConfigError::InvalidEnvVar("LALIN_DEFAULT_DATE".to_string(), e.to_string()))?;

        let log_format = match env.optional("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            api,
            default_date,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
