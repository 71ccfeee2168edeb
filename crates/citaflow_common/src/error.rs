// --- File: crates/citaflow_common/src/error.rs ---

/// A trait for converting domain errors to HTTP status codes.
///
/// Implemented by error taxonomies in feature crates so handlers can map a
/// classified failure to a response code without matching on variants.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}
