//! Domain models for the dashboard.

pub mod session;

pub use session::{ApiSession, SessionToken, keys as session_keys};
