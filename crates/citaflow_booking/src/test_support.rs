// --- File: crates/citaflow_booking/src/test_support.rs ---
//! In-memory recording fakes for the three external services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use citaflow_common::services::{
    BoxFuture, BoxedError, CalendarService, CreatedEvent, EmailMessage, EventDraft, EventSummary,
    LedgerRow, LedgerService, NotificationService,
};
use citaflow_config::BookingConfig;

use crate::catalog::ServiceCatalog;
use crate::coordinator::{BookingCoordinator, BookingRequest, BookingServices};

/// Calendar fake: serves a fixed event list and records inserts.
pub struct FakeCalendar {
    pub events: Vec<EventSummary>,
    pub list_calls: AtomicUsize,
    pub inserted: Mutex<Vec<EventDraft>>,
    pub fail_list: bool,
    pub fail_insert: bool,
}

impl FakeCalendar {
    pub fn empty() -> Self {
        Self::with_events(Vec::new())
    }

    pub fn with_events(events: Vec<EventSummary>) -> Self {
        Self {
            events,
            list_calls: AtomicUsize::new(0),
            inserted: Mutex::new(Vec::new()),
            fail_list: false,
            fail_insert: false,
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

impl CalendarService for FakeCalendar {
    fn list_events_overlapping(
        &self,
        _calendar_id: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<EventSummary>, BoxedError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_list {
            Err(BoxedError::msg("calendar list failed"))
        } else {
            Ok(self.events.clone())
        };
        Box::pin(async move { result })
    }

    fn insert_event(
        &self,
        _calendar_id: &str,
        draft: EventDraft,
    ) -> BoxFuture<'_, CreatedEvent, BoxedError> {
        let result = if self.fail_insert {
            Err(BoxedError::msg("calendar insert failed"))
        } else {
            self.inserted.lock().unwrap().push(draft);
            Ok(CreatedEvent {
                event_id: Some("evt-1".to_string()),
                html_link: Some("https://calendar.google.com/event?eid=evt-1".to_string()),
                status: "confirmed".to_string(),
            })
        };
        Box::pin(async move { result })
    }
}

/// Ledger fake: records appended rows.
pub struct FakeLedger {
    pub rows: Mutex<Vec<LedgerRow>>,
    pub fail_append: bool,
}

impl FakeLedger {
    pub fn working() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_append: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_append: true,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl LedgerService for FakeLedger {
    fn append_row(&self, row: LedgerRow) -> BoxFuture<'_, (), BoxedError> {
        let result = if self.fail_append {
            Err(BoxedError::msg("sheet append failed"))
        } else {
            self.rows.lock().unwrap().push(row);
            Ok(())
        };
        Box::pin(async move { result })
    }
}

/// Mailer fake: records sent messages.
pub struct FakeMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail_send: bool,
}

impl FakeMailer {
    pub fn working() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_send: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_send: true,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl NotificationService for FakeMailer {
    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, (), BoxedError> {
        let result = if self.fail_send {
            Err(BoxedError::msg("smtp unreachable"))
        } else {
            self.sent.lock().unwrap().push(message);
            Ok(())
        };
        Box::pin(async move { result })
    }
}

pub fn services(
    calendar: Arc<FakeCalendar>,
    ledger: Arc<FakeLedger>,
    mailer: Arc<FakeMailer>,
) -> BookingServices {
    BookingServices {
        calendar,
        ledger,
        mailer,
    }
}

pub fn coordinator(services: BookingServices) -> BookingCoordinator {
    BookingCoordinator::new(
        services,
        ServiceCatalog::new(BookingConfig::default().services),
        "primary".to_string(),
        Some("owner@example.com".to_string()),
        "cita".to_string(),
        Tz::Europe__Madrid,
    )
}

pub fn request() -> BookingRequest {
    BookingRequest {
        date: "2024-03-15 09:00".to_string(),
        service_type: "consulta".to_string(),
        nombre: "Ana".to_string(),
        apellido: "García".to_string(),
        email: "ana@example.com".to_string(),
        telefono: "600000000".to_string(),
    }
}

/// An appointment event overlapping the [`request`] slot.
pub fn blocking_event() -> EventSummary {
    EventSummary {
        id: "blk-1".to_string(),
        summary: "Cita: Luis Pérez (Consulta Nutricional)".to_string(),
        status: "confirmed".to_string(),
        start: Some("2024-03-15T08:30:00Z".parse().unwrap()),
        end: Some("2024-03-15T09:30:00Z".parse().unwrap()),
    }
}
