// --- File: crates/citaflow_booking/src/slot.rs ---
//! Time-slot resolver: a client-supplied date and `HH:MM` time plus a service
//! duration become a half-open interval `[start, start + duration)` in the
//! practice's civil time zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::error::BookingError;

/// A concrete half-open appointment interval, zone-qualified.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeInterval {
    pub fn start_utc(&self) -> DateTime<chrono::Utc> {
        self.start.with_timezone(&chrono::Utc)
    }

    pub fn end_utc(&self) -> DateTime<chrono::Utc> {
        self.end.with_timezone(&chrono::Utc)
    }

    /// Wall-clock rendering for the ledger and the confirmation mail,
    /// es-ES day-first order.
    pub fn format_local(&self) -> String {
        self.start.format("%-d/%-m/%Y, %H:%M").to_string()
    }
}

/// Splits the frontend's combined `"YYYY-MM-DD HH:MM"` date field into its
/// date and time tokens.
pub fn split_date_field(date: &str) -> Result<(&str, &str), BookingError> {
    let mut parts = date.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date_token), Some(time_token), None) => Ok((date_token, time_token)),
        _ => Err(malformed()),
    }
}

fn parse_time_token(token: &str) -> Result<(u32, u32), BookingError> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 2 {
        return Err(malformed());
    }
    let hours: u32 = parts[0].parse().map_err(|_| malformed())?;
    let minutes: u32 = parts[1].parse().map_err(|_| malformed())?;
    if hours > 23 || minutes > 59 {
        return Err(malformed());
    }
    Ok((hours, minutes))
}

fn malformed() -> BookingError {
    BookingError::MalformedInput("Formato de fecha u hora no válido.".to_string())
}

/// Resolves date and time tokens against a service duration.
///
/// Wall-clock times skipped by the spring-forward transition do not exist in
/// the zone and are rejected; ambiguous fall-back times take the earlier
/// offset.
pub fn resolve_slot(
    date_token: &str,
    time_token: &str,
    duration_minutes: i64,
    zone: Tz,
) -> Result<TimeInterval, BookingError> {
    if duration_minutes <= 0 {
        return Err(BookingError::Config(format!(
            "non-positive service duration: {duration_minutes}"
        )));
    }

    let date = NaiveDate::parse_from_str(date_token, "%Y-%m-%d").map_err(|_| malformed())?;
    let (hours, minutes) = parse_time_token(time_token)?;

    // Ranges were checked above, and_hms_opt cannot fail here
    let naive = date.and_hms_opt(hours, minutes, 0).ok_or_else(malformed)?;

    let start = match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => return Err(malformed()),
    };

    let end = start + Duration::minutes(duration_minutes);
    Ok(TimeInterval { start, end })
}
