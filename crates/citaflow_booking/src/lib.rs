// --- File: crates/citaflow_booking/src/lib.rs ---
// Declare modules within this crate
pub mod catalog;
pub mod coordinator;
#[cfg(test)]
mod coordinator_test;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod oracle;
pub mod routes;
pub mod slot;
#[cfg(test)]
mod test_support;

pub use coordinator::{BookingCoordinator, BookingRequest, BookingServices};
pub use error::BookingError;
