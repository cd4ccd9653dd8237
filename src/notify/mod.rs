//! Alert delivery
//!
//! Sends a bare plain-text email for each detection. Delivery is
//! fire-and-forget: failures are logged and never reach the poll loop.

use lettre::address::{AddressError, Envelope};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, SmtpTransport, Transport};
use log::{error, info};
use std::num::ParseIntError;
use thiserror::Error;

use crate::daemon::config::EmailSettings;

/// Reasons an alert could not be submitted
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address {value:?}: {source}")]
    Address {
        value: String,
        #[source]
        source: AddressError,
    },

    #[error("invalid SMTP port {value:?}: {source}")]
    Port {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid envelope: {0}")]
    Envelope(#[from] lettre::error::Error),

    #[error("SMTP submission failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Capability to deliver an alert
pub trait Notifier: Send + Sync {
    /// Attempt delivery once; never fails the caller
    fn notify(&self, subject: &str, body: &str);
}

/// Notifier submitting alerts to an SMTP server with PLAIN authentication
pub struct SmtpNotifier {
    settings: EmailSettings,
}

impl SmtpNotifier {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    /// Compose and submit one message
    pub fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let from = parse_address(&self.settings.from)?;
        let to = parse_address(&self.settings.to)?;
        let port: u16 = self
            .settings
            .smtp_port
            .trim()
            .parse()
            .map_err(|source| NotifyError::Port {
                value: self.settings.smtp_port.clone(),
                source,
            })?;

        let envelope = Envelope::new(Some(from), vec![to])?;
        let message = compose_message(&self.settings, subject, body);

        let tls = TlsParameters::new(self.settings.smtp_host.clone())?;
        let transport = SmtpTransport::builder_dangerous(self.settings.smtp_host.as_str())
            .port(port)
            .tls(Tls::Opportunistic(tls))
            .credentials(Credentials::new(
                self.settings.from.clone(),
                self.settings.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain])
            .build();

        transport.send_raw(&envelope, message.as_bytes())?;
        Ok(())
    }
}

impl Notifier for SmtpNotifier {
    fn notify(&self, subject: &str, body: &str) {
        match self.send(subject, body) {
            Ok(()) => info!("Alert email sent to {}", self.settings.to),
            Err(e) => error!("Failed to send alert email: {}", e),
        }
    }
}

/// Render the bare message: From/To/Subject headers, blank line, body
pub fn compose_message(settings: &EmailSettings, subject: &str, body: &str) -> String {
    format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
        settings.from, settings.to, subject, body
    )
}

fn parse_address(value: &str) -> Result<Address, NotifyError> {
    value.trim().parse().map_err(|source| NotifyError::Address {
        value: value.to_string(),
        source,
    })
}
