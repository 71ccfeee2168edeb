// --- File: crates/citaflow_booking/src/catalog.rs ---
//! Service catalog lookup.
//!
//! The catalog is loaded from configuration at startup (with a built-in
//! default set) and never changes afterwards. Unrecognized service ids are
//! rejected rather than silently substituted: the same policy applies to
//! duration, pricing and display text.

use citaflow_config::ServiceDefinition;

use crate::error::BookingError;

#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<ServiceDefinition>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceDefinition>) -> Self {
        Self { services }
    }

    pub fn lookup(&self, id: &str) -> Option<&ServiceDefinition> {
        self.services
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id.trim()))
    }

    pub fn resolve(&self, id: &str) -> Result<&ServiceDefinition, BookingError> {
        self.lookup(id)
            .ok_or_else(|| BookingError::UnknownService(id.trim().to_string()))
    }
}
