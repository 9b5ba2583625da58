//! Core types for the toll-gate domain.
//!
//! This module provides type-safe wrappers for identifiers, shifts,
//! payment counters and timestamps.

pub mod id;
pub mod payment;
pub mod shift;
pub mod timestamp;

pub use id::*;
pub use payment::{PaymentCounts, PaymentMethod};
pub use shift::Shift;
pub use timestamp::{Timestamp, TimestampError, WIB_OFFSET_SECONDS, long_date_id};
