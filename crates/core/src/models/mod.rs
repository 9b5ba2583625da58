//! Records exchanged with the toll-gate backend.

pub mod gate;
pub mod traffic;

pub use gate::{GateDirectory, GateDraft, GateKey, GateRecord, GateValidationError};
pub use traffic::{TrafficEntry, TrafficRecord};
