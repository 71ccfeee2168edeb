// --- File: crates/citaflow_booking/src/coordinator.rs ---
//! Booking transaction coordinator.
//!
//! Five sequential stages per request: Validate → Resolve → Check → Reserve
//! → Record, plus the non-critical Notify. The stages have different failure
//! criticality and no shared transaction:
//!
//! * Validate/Resolve fail before any external call.
//! * Check unavailable is a `Conflict`; a failing check is
//!   `UpstreamUnavailable`.
//! * Reserve failure leaves nothing behind, so nothing is rolled back.
//! * Record failure after a successful Reserve is a `PartialFailure`: the
//!   calendar event stays (the calendar is authoritative, the ledger is a
//!   best-effort audit trail) and the caller still receives the event id.
//! * Notify failure is logged and swallowed; it never fails the booking.
//!
//! There is intentionally no in-process lock between concurrent requests:
//! the check-then-act race against the external calendar cannot be closed
//! from here (other processes and humans write the same calendar), so a
//! process-local mutex would only hide the problem.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use citaflow_common::services::{
    CalendarService, EventDraft, LedgerRow, LedgerService, NotificationService, ReminderOverride,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::catalog::ServiceCatalog;
use crate::error::BookingError;
use crate::notify::render_confirmation;
use crate::oracle;
use crate::slot::{resolve_slot, split_date_field};

/// The client-submitted booking form. Field names follow the existing
/// frontend payload.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    /// Combined "YYYY-MM-DD HH:MM".
    pub date: String,
    pub service_type: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
}

/// What a successful booking hands back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub event_id: Option<String>,
    pub html_link: Option<String>,
    pub message: String,
}

/// The process-wide external-service handles, built once at startup and
/// injected into the coordinator. Immutable after construction, safe to
/// share across concurrent requests.
#[derive(Clone)]
pub struct BookingServices {
    pub calendar: Arc<dyn CalendarService>,
    pub ledger: Arc<dyn LedgerService>,
    pub mailer: Arc<dyn NotificationService>,
}

pub struct BookingCoordinator {
    services: BookingServices,
    catalog: ServiceCatalog,
    calendar_id: String,
    owner_email: Option<String>,
    keyword: String,
    zone: Tz,
}

impl BookingCoordinator {
    pub fn new(
        services: BookingServices,
        catalog: ServiceCatalog,
        calendar_id: String,
        owner_email: Option<String>,
        keyword: String,
        zone: Tz,
    ) -> Self {
        Self {
            services,
            catalog,
            calendar_id,
            owner_email,
            keyword,
            zone,
        }
    }

    /// The read-only half of the transaction, exposed for the frontend's
    /// pre-check. Resolves the interval and asks the oracle.
    pub async fn check_availability(
        &self,
        date: &str,
        service_type: &str,
    ) -> Result<bool, BookingError> {
        let service = self.catalog.resolve(service_type)?;
        let (date_token, time_token) = split_date_field(date)?;
        let interval = resolve_slot(date_token, time_token, service.duration_minutes, self.zone)?;

        oracle::is_available(
            self.services.calendar.as_ref(),
            &self.calendar_id,
            &interval,
            &self.keyword,
        )
        .await
    }

    /// Runs the whole booking transaction.
    pub async fn process(&self, request: BookingRequest) -> Result<BookingOutcome, BookingError> {
        // --- Stage 1: Validate (repeatable, no side effects) ---
        let request = validate(request)?;

        // --- Stage 2: Resolve ---
        let service = self.catalog.resolve(&request.service_type)?;
        let (date_token, time_token) = split_date_field(&request.date)?;
        let interval = resolve_slot(date_token, time_token, service.duration_minutes, self.zone)?;

        // --- Stage 3: Check ---
        let available = oracle::is_available(
            self.services.calendar.as_ref(),
            &self.calendar_id,
            &interval,
            &self.keyword,
        )
        .await?;
        if !available {
            return Err(BookingError::Conflict);
        }

        // --- Stage 4: Reserve ---
        let mut attendees = vec![request.email.clone()];
        if let Some(owner) = &self.owner_email {
            attendees.push(owner.clone());
        }
        let draft = EventDraft {
            summary: format!(
                "Cita: {} {} ({})",
                request.nombre, request.apellido, service.name
            ),
            description: format!(
                "Tipo: {}\nEmail Cliente: {}\nTeléfono: {}",
                service.name, request.email, request.telefono
            ),
            start: interval.start_utc(),
            end: interval.end_utc(),
            time_zone: self.zone.name().to_string(),
            attendees,
            reminder_overrides: vec![
                ReminderOverride {
                    method: "email".to_string(),
                    minutes: 24 * 60,
                },
                ReminderOverride {
                    method: "popup".to_string(),
                    minutes: 10,
                },
            ],
        };

        let created = self
            .services
            .calendar
            .insert_event(&self.calendar_id, draft)
            .await
            .map_err(|e| BookingError::ReservationFailed(e.to_string()))?;
        info!("Created calendar event {:?}", created.event_id);

        // --- Stage 5: Record (no rollback against stage 4 on failure) ---
        let row = LedgerRow {
            timestamp: Utc::now().to_rfc3339(),
            nombre: request.nombre.clone(),
            apellido: request.apellido.clone(),
            email: request.email.clone(),
            telefono: request.telefono.clone(),
            service_type: service.id.clone(),
            start_local: interval.format_local(),
            event_link: created.html_link.clone().unwrap_or_default(),
        };
        if let Err(e) = self.services.ledger.append_row(row).await {
            error!(
                "Ledger append failed after reservation {:?}: {} (manual reconciliation needed)",
                created.event_id, e
            );
            return Err(BookingError::PartialFailure {
                detail: e.to_string(),
                event_id: created.event_id,
                html_link: created.html_link,
            });
        }

        // --- Stage 6: Notify (never fails the transaction) ---
        let mail = render_confirmation(
            &request,
            service,
            &interval.format_local(),
            created.html_link.as_deref(),
        );
        if let Err(e) = self.services.mailer.send_email(mail).await {
            warn!("Confirmation mail failed (non-critical): {}", e);
        }

        info!("Booking completed for {} {}", request.nombre, request.apellido);
        Ok(BookingOutcome {
            event_id: created.event_id,
            html_link: created.html_link,
            message: "Cita creada exitosamente".to_string(),
        })
    }
}

fn validate(mut request: BookingRequest) -> Result<BookingRequest, BookingError> {
    for field in [
        &mut request.date,
        &mut request.service_type,
        &mut request.nombre,
        &mut request.apellido,
        &mut request.email,
        &mut request.telefono,
    ] {
        *field = field.trim().to_string();
        if field.is_empty() {
            return Err(BookingError::MalformedInput(
                "Faltan campos obligatorios para la reserva.".to_string(),
            ));
        }
    }
    Ok(request)
}
