//! Lalin Core - Shared types and logic for the toll-gate traffic dashboard.
//!
//! This crate provides the domain used by every component:
//! - `admin` - Browser dashboard served by axum
//! - `cli` - Command-line exports and gate management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Collections are fetched elsewhere and handed in as slices.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, shifts, payment counters and timestamps
//! - [`models`] - Gate and traffic records as exchanged with the backend
//! - [`listing`] - Search filtering and pagination
//! - [`report`] - CSV export
//! - [`stats`] - Dashboard aggregates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod models;
pub mod report;
pub mod stats;
pub mod types;

pub use models::*;
pub use types::*;
