//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing with status and latency)
//! 3. Session layer (tower-sessions, in-memory store)
//! 4. Auth extractors on protected handlers

pub mod auth;
pub mod session;

pub use auth::{OptionalSession, RequireSession, clear_current_session, set_current_session};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
