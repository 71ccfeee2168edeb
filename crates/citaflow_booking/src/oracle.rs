// --- File: crates/citaflow_booking/src/oracle.rs ---
//! Availability oracle.
//!
//! The shared calendar is the single source of truth: a slot is free iff no
//! blocking event overlaps it. What counts as "blocking" is a keyword
//! heuristic on the event title, kept as one named policy function so a
//! structured marker can replace it without touching the coordinator.

use citaflow_common::services::{CalendarService, EventSummary};
use tracing::debug;

use crate::error::BookingError;
use crate::slot::TimeInterval;

/// An event occupies a slot iff it is not cancelled and its title contains
/// the appointment keyword, case-insensitively. Unrelated calendar entries
/// (personal blocks, reminders) do not block.
///
/// Known limitation: any externally created event containing the keyword
/// blocks, and an appointment missing the keyword does not.
pub fn blocks_slot(event: &EventSummary, keyword: &str) -> bool {
    event.status != "cancelled"
        && event
            .summary
            .to_lowercase()
            .contains(&keyword.to_lowercase())
}

/// True iff no blocking event overlaps the interval. A failing calendar
/// query is `UpstreamUnavailable`, never "busy".
pub async fn is_available(
    calendar: &dyn CalendarService,
    calendar_id: &str,
    interval: &TimeInterval,
    keyword: &str,
) -> Result<bool, BookingError> {
    let events = calendar
        .list_events_overlapping(calendar_id, interval.start_utc(), interval.end_utc())
        .await
        .map_err(|e| BookingError::UpstreamUnavailable(e.to_string()))?;

    let blocking = events.iter().filter(|e| blocks_slot(e, keyword)).count();
    debug!(
        "{} of {} events in [{}, {}) block the slot",
        blocking,
        events.len(),
        interval.start,
        interval.end
    );
    Ok(blocking == 0)
}
