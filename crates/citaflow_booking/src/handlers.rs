// --- File: crates/citaflow_booking/src/handlers.rs

use axum::{extract::State, http::StatusCode, response::Json};
use chrono_tz::Tz;
use citaflow_common::HttpStatusCode;
use citaflow_config::AppConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

use crate::catalog::ServiceCatalog;
use crate::coordinator::{BookingCoordinator, BookingRequest, BookingServices};
use crate::error::BookingError;

// Shared state for the booking routes: the loaded config plus the external
// service handles built at startup.
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub services: BookingServices,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityRequest {
    /// Combined "YYYY-MM-DD HH:MM" in the practice's time zone.
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityResponse {
    pub success: bool,
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReservationRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "type", default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellido: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReservationResponse {
    pub success: bool,
    pub message: String,
    pub calendar_event_id: Option<String>,
    pub calendar_link: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_link: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub has_calendar_id: bool,
    pub has_sheet_id: bool,
    pub has_owner_email: bool,
    pub has_credentials: bool,
    pub has_mail_account: bool,
}

fn error_response(err: BookingError) -> (StatusCode, Json<ErrorBody>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let (event_id, link) = match &err {
        BookingError::PartialFailure {
            event_id,
            html_link,
            ..
        } => (event_id.clone(), html_link.clone()),
        _ => (None, None),
    };
    let body = ErrorBody {
        success: false,
        message: err.to_string(),
        error: err.detail().map(|d| d.to_string()),
        calendar_event_id: event_id,
        calendar_link: link,
    };
    (status, Json(body))
}

/// Builds a coordinator from the loaded config, failing with `Config` when a
/// required value is absent. Cheap: the service handles are Arc clones.
fn build_coordinator(state: &BookingState) -> Result<BookingCoordinator, BookingError> {
    let calendar_id = state
        .config
        .gcal
        .calendar_id
        .clone()
        .ok_or_else(|| BookingError::Config("calendar ID missing".to_string()))?;

    let booking = &state.config.booking;
    let zone = Tz::from_str(&booking.time_zone).unwrap_or_else(|_| {
        warn!("Invalid time zone '{}', using Europe/Madrid", booking.time_zone);
        chrono_tz::Europe::Madrid
    });

    Ok(BookingCoordinator::new(
        state.services.clone(),
        ServiceCatalog::new(booking.services.clone()),
        calendar_id,
        booking.owner_email.clone(),
        booking.appointment_keyword.clone(),
        zone,
    ))
}

/// Handler for the frontend's availability pre-check.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/check-availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availability verdict", body = AvailabilityResponse),
        (status = 400, description = "Missing or malformed parameters", body = ErrorBody),
        (status = 503, description = "Calendar unreachable", body = ErrorBody)
    ),
    tag = "Booking"
))]
pub async fn check_availability_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, (StatusCode, Json<ErrorBody>)> {
    let (date, service_type) = match (payload.date, payload.service_type) {
        (Some(d), Some(t)) if !d.trim().is_empty() && !t.trim().is_empty() => (d, t),
        _ => {
            return Err(error_response(BookingError::MalformedInput(
                "Faltan parámetros de fecha o tipo de cita.".to_string(),
            )))
        }
    };

    let coordinator = build_coordinator(&state).map_err(error_response)?;
    let is_available = coordinator
        .check_availability(&date, &service_type)
        .await
        .map_err(error_response)?;

    Ok(Json(AvailabilityResponse {
        success: true,
        is_available,
    }))
}

/// Handler for the booking transaction.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/reservar",
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Appointment created", body = ReservationResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorBody),
        (status = 409, description = "Slot no longer available", body = ErrorBody),
        (status = 502, description = "Event creation failed", body = ErrorBody),
        (status = 500, description = "Event created but ledger append failed", body = ErrorBody)
    ),
    tag = "Booking"
))]
pub async fn create_reservation_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<ReservationRequest>,
) -> Result<Json<ReservationResponse>, (StatusCode, Json<ErrorBody>)> {
    let request = BookingRequest {
        date: payload.date.unwrap_or_default(),
        service_type: payload.service_type.unwrap_or_default(),
        nombre: payload.nombre.unwrap_or_default(),
        apellido: payload.apellido.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        telefono: payload.telefono.unwrap_or_default(),
    };

    let coordinator = build_coordinator(&state).map_err(error_response)?;
    let outcome = coordinator.process(request).await.map_err(error_response)?;

    Ok(Json(ReservationResponse {
        success: true,
        message: outcome.message,
        calendar_event_id: outcome.event_id,
        calendar_link: outcome.html_link,
    }))
}

/// Deployment smoke check: reports which required configuration values are
/// present, without exposing any of them.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Configuration presence report", body = HealthResponse)
    ),
    tag = "Booking"
))]
pub async fn health_handler(State(state): State<Arc<BookingState>>) -> Json<HealthResponse> {
    let config = &state.config;
    let auth = &config.google_auth;
    let has_credentials = auth.key_path.is_some()
        || auth.credentials_json.is_some()
        || auth.oauth.as_ref().is_some_and(|o| {
            o.client_id.is_some() && o.client_secret.is_some() && o.refresh_token.is_some()
        });

    Json(HealthResponse {
        status: "ok".to_string(),
        has_calendar_id: config.gcal.calendar_id.is_some(),
        has_sheet_id: config.sheets.sheet_id.is_some(),
        has_owner_email: config.booking.owner_email.is_some(),
        has_credentials,
        has_mail_account: config.smtp.user.is_some() && config.smtp.pass.is_some(),
    })
}
