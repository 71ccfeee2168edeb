// --- File: crates/citaflow_mail/src/lib.rs ---
//! SMTP implementation of the [`NotificationService`] trait.
//!
//! Confirmation mail goes out through an authenticated SMTP relay (the
//! existing deployments use a Gmail account with an app password). The
//! transport is built once at startup; lettre pools connections internally.

use citaflow_common::services::{BoxFuture, BoxedError, EmailMessage, NotificationService};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds a relay transport with username/password authentication. The
    /// sending account doubles as the From address, matching how the Gmail
    /// relay expects it.
    pub fn new(host: &str, user: &str, pass: &str) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();
        let from: Mailbox = user.parse()?;
        Ok(Self { transport, from })
    }
}

impl NotificationService for SmtpMailer {
    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, (), BoxedError> {
        Box::pin(async move {
            let email = Message::builder()
                .from(self.from.clone())
                .to(message
                    .to
                    .parse::<Mailbox>()
                    .map_err(|e| BoxedError::new(MailError::from(e)))?)
                .subject(message.subject)
                .header(ContentType::TEXT_HTML)
                .body(message.html_body)
                .map_err(|e| BoxedError::new(MailError::from(e)))?;

            self.transport
                .send(email)
                .await
                .map_err(|e| BoxedError::new(MailError::from(e)))?;
            debug!("Confirmation mail sent to {}", message.to);
            Ok(())
        })
    }
}

/// Stand-in used when no SMTP account is configured. Every send fails, which
/// the booking flow treats as a non-critical notification failure, so the
/// server still runs and `/health` can report the missing account.
pub struct DisabledMailer;

impl NotificationService for DisabledMailer {
    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, (), BoxedError> {
        Box::pin(async move {
            debug!("Mail to {} dropped, no SMTP account configured", message.to);
            Err(BoxedError::msg("SMTP account not configured"))
        })
    }
}
