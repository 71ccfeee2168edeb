// File: services/citaflow_backend/src/app_state.rs
//! Startup wiring: turns the loaded configuration into the concrete external
//! service handles the booking routes run against.

use std::error::Error;
use std::sync::Arc;

use citaflow_booking::BookingServices;
use citaflow_config::AppConfig;
use citaflow_google::{create_google_hubs, GoogleCalendarService, SheetsLedger};
use citaflow_common::services::NotificationService;
use citaflow_mail::{DisabledMailer, SmtpMailer};
use tracing::warn;

/// Builds the calendar, ledger and mailer handles. Authenticates against the
/// Google APIs once; the hubs are shared across all requests.
pub async fn build_services(
    config: &AppConfig,
) -> Result<BookingServices, Box<dyn Error + Send + Sync>> {
    let hubs = create_google_hubs(&config.google_auth).await?;

    let calendar = Arc::new(GoogleCalendarService::new(Arc::new(hubs.calendar)));

    // A missing sheet id does not stop the server; appends will fail and
    // surface as partial bookings, and /health reports the gap.
    let sheet_id = config.sheets.sheet_id.clone().unwrap_or_else(|| {
        warn!("No sheet ID configured, ledger appends will fail");
        String::new()
    });
    let ledger = Arc::new(SheetsLedger::new(
        Arc::new(hubs.sheets),
        sheet_id,
        config.sheets.range.clone(),
    ));

    // Like the sheet id, a missing SMTP account does not stop the server:
    // confirmation mail is non-critical and /health reports the gap.
    let mailer: Arc<dyn NotificationService> = match (&config.smtp.user, &config.smtp.pass) {
        (Some(user), Some(pass)) => Arc::new(SmtpMailer::new(&config.smtp.host, user, pass)?),
        _ => {
            warn!("No SMTP account configured (EMAIL_USER / EMAIL_PASS), confirmation mail disabled");
            Arc::new(DisabledMailer)
        }
    };

    Ok(BookingServices {
        calendar,
        ledger,
        mailer,
    })
}
