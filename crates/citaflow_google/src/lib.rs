// --- File: crates/citaflow_google/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod calendar;
pub mod ledger;

pub use auth::{create_google_hubs, GoogleCredentials, GoogleHubs};
pub use calendar::GoogleCalendarService;
pub use ledger::SheetsLedger;
