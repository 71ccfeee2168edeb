// --- File: crates/citaflow_common/src/lib.rs ---
//! Shared machinery for the Citaflow workspace: service traits the booking
//! coordinator depends on, the HTTP status mapping trait and logging setup.

pub mod error;
pub mod logging;
pub mod services;

pub use error::HttpStatusCode;
