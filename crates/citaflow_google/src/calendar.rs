// --- File: crates/citaflow_google/src/calendar.rs ---
//! Google Calendar implementation of the [`CalendarService`] trait.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use citaflow_common::services::{
    BoxFuture, BoxedError, CalendarService, CreatedEvent, EventDraft, EventSummary,
};
use google_calendar3::api::{Event, EventAttendee, EventDateTime, EventReminder, EventReminders};
use thiserror::Error;
use tracing::debug;

use crate::auth::CalendarHubType;

#[derive(Error, Debug)]
pub enum CalendarApiError {
    #[error("Google Calendar API error: {0}")]
    Api(#[from] google_calendar3::Error),
}

/// Calendar access over an authenticated hub shared by all requests.
pub struct GoogleCalendarService {
    hub: Arc<CalendarHubType>,
}

impl GoogleCalendarService {
    pub fn new(hub: Arc<CalendarHubType>) -> Self {
        Self { hub }
    }
}

impl CalendarService for GoogleCalendarService {
    fn list_events_overlapping(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<EventSummary>, BoxedError> {
        let calendar_id = calendar_id.to_string();
        let hub = Arc::clone(&self.hub);

        Box::pin(async move {
            let (_response, events_list) = hub
                .events()
                .list(&calendar_id)
                .time_min(start)
                .time_max(end)
                .single_events(true) // Expand recurring events
                .order_by("startTime")
                .doit()
                .await
                .map_err(|e| BoxedError::new(CalendarApiError::from(e)))?;

            let mut events = Vec::new();
            if let Some(items) = events_list.items {
                for event in items {
                    let status = event.status.unwrap_or_else(|| "confirmed".to_string());
                    if status == "cancelled" {
                        continue;
                    }
                    events.push(EventSummary {
                        id: event.id.unwrap_or_default(),
                        summary: event.summary.unwrap_or_default(),
                        status,
                        start: event.start.and_then(|s| s.date_time),
                        end: event.end.and_then(|e| e.date_time),
                    });
                }
            }
            debug!(
                "Found {} non-cancelled events in [{}, {})",
                events.len(),
                start,
                end
            );
            Ok(events)
        })
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        draft: EventDraft,
    ) -> BoxFuture<'_, CreatedEvent, BoxedError> {
        let calendar_id = calendar_id.to_string();
        let hub = Arc::clone(&self.hub);

        Box::pin(async move {
            let new_event = Event {
                summary: Some(draft.summary),
                description: Some(draft.description),
                start: Some(EventDateTime {
                    date_time: Some(draft.start),
                    time_zone: Some(draft.time_zone.clone()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(draft.end),
                    time_zone: Some(draft.time_zone),
                    ..Default::default()
                }),
                attendees: Some(
                    draft
                        .attendees
                        .into_iter()
                        .map(|email| EventAttendee {
                            email: Some(email),
                            ..Default::default()
                        })
                        .collect(),
                ),
                reminders: Some(EventReminders {
                    use_default: Some(false),
                    overrides: Some(
                        draft
                            .reminder_overrides
                            .into_iter()
                            .map(|r| EventReminder {
                                method: Some(r.method),
                                minutes: Some(r.minutes),
                            })
                            .collect(),
                    ),
                }),
                ..Default::default()
            };

            let (_response, created) = hub
                .events()
                .insert(new_event, &calendar_id)
                .send_updates("all") // Invitation mail goes out with the event
                .doit()
                .await
                .map_err(|e| BoxedError::new(CalendarApiError::from(e)))?;

            Ok(CreatedEvent {
                event_id: created.id,
                html_link: created.html_link,
                status: created.status.unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
