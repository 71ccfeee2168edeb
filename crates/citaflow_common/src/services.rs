// --- File: crates/citaflow_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The booking coordinator only ever talks to the calendar, the ledger and
//! the mailer through these traits, so the whole transaction can be exercised
//! against in-memory fakes. All three return [`BoxedError`]: the coordinator
//! classifies a failure by the stage it happened in, not by its payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result.
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements `std::error::Error` for
/// `Box<dyn std::error::Error + Send + Sync>`.
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

impl BoxedError {
    pub fn new<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        BoxedError(Box::new(err))
    }

    pub fn msg(msg: impl Into<String>) -> Self {
        #[derive(Debug)]
        struct Message(String);
        impl fmt::Display for Message {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
        impl StdError for Message {}
        BoxedError(Box::new(Message(msg.into())))
    }
}

/// A trait for calendar operations.
///
/// The calendar is both the availability source of truth and the reservation
/// mechanism: a slot is taken exactly when a blocking event overlaps it.
pub trait CalendarService: Send + Sync {
    /// List non-cancelled events overlapping `[start, end)`, recurring
    /// events expanded to concrete occurrences, ordered by start.
    fn list_events_overlapping(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<EventSummary>, BoxedError>;

    /// Create an event, asking the service to notify attendees.
    fn insert_event(
        &self,
        calendar_id: &str,
        draft: EventDraft,
    ) -> BoxFuture<'_, CreatedEvent, BoxedError>;
}

/// A trait for the append-only booking ledger.
pub trait LedgerService: Send + Sync {
    fn append_row(&self, row: LedgerRow) -> BoxFuture<'_, (), BoxedError>;
}

/// A trait for outbound notifications.
pub trait NotificationService: Send + Sync {
    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, (), BoxedError>;
}

/// A calendar event as seen by the availability query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub summary: String,
    /// "confirmed", "tentative" or "cancelled".
    pub status: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// A desired calendar event, submitted for creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA zone name the event is displayed in.
    pub time_zone: String,
    pub attendees: Vec<String>,
    pub reminder_overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderOverride {
    /// "email" or "popup".
    pub method: String,
    pub minutes: i32,
}

/// What the calendar hands back after a successful insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub event_id: Option<String>,
    pub html_link: Option<String>,
    pub status: String,
}

/// One row of the booking ledger, appended per successful reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    pub timestamp: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub service_type: String,
    /// Start instant formatted in the booking zone's wall clock.
    pub start_local: String,
    pub event_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}
