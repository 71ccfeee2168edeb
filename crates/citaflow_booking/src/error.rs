// --- File: crates/citaflow_booking/src/error.rs ---
//! Booking failure taxonomy.
//!
//! Display strings are the user-facing (Spanish) messages returned in the
//! `message` response field; the technical detail travels separately through
//! [`BookingError::detail`] so callers never see a raw internal error.

use citaflow_common::HttpStatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    /// Client-fixable: a required field is missing or unparsable. Detected
    /// before any external call.
    #[error("{0}")]
    MalformedInput(String),

    /// Client-fixable: the service id maps to no catalog entry.
    #[error("Tipo de cita desconocido: {0}")]
    UnknownService(String),

    /// The slot overlaps a blocking event; the caller should offer another
    /// time.
    #[error("El horario seleccionado ya no está disponible.")]
    Conflict,

    /// The availability query itself failed; retrying the whole request
    /// later is safe since nothing was written.
    #[error("Error al verificar disponibilidad en el calendario.")]
    UpstreamUnavailable(String),

    /// Event creation failed; no event exists, nothing to roll back.
    #[error("Error al procesar la reserva.")]
    ReservationFailed(String),

    /// The calendar event exists but the ledger append failed. The event is
    /// deliberately NOT deleted; an operator reconciles by hand.
    #[error("La cita se creó pero no se pudo registrar en el libro de reservas.")]
    PartialFailure {
        detail: String,
        event_id: Option<String>,
        html_link: Option<String>,
    },

    /// A required configuration value is absent.
    #[error("Error de configuración del servidor: {0}")]
    Config(String),
}

impl BookingError {
    /// Technical detail for the optional `error` response field.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BookingError::UpstreamUnavailable(detail)
            | BookingError::ReservationFailed(detail)
            | BookingError::PartialFailure { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::MalformedInput(_) => 400,
            BookingError::UnknownService(_) => 400,
            BookingError::Conflict => 409,
            BookingError::UpstreamUnavailable(_) => 503,
            BookingError::ReservationFailed(_) => 502,
            BookingError::PartialFailure { .. } => 500,
            BookingError::Config(_) => 500,
        }
    }
}
