//! SMTP transport backed by `lettre`.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

use super::transport::{MailTransport, OutboundEmail, TransportError};
use crate::config::MailSettings;

/// SMTP relay transport.
///
/// Connections are pooled by `lettre`; every `deliver` call is bounded by the
/// configured timeout.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Build the transport from mail settings.
    pub fn from_settings(settings: &MailSettings) -> Result<Self, TransportError> {
        let builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| TransportError::Setup(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let mut builder = builder
            .port(settings.port)
            .timeout(Some(Duration::from_secs(settings.timeout_secs)));

        if settings.has_credentials() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            host: settings.host.clone(),
        })
    }

    fn mailbox(address: &str) -> Result<Mailbox, TransportError> {
        address
            .trim()
            .parse::<Mailbox>()
            .map_err(|e| TransportError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    fn build_message(email: &OutboundEmail) -> Result<Message, TransportError> {
        Message::builder()
            .from(Self::mailbox(&email.from)?)
            .to(Self::mailbox(&email.to)?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| TransportError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    #[instrument(skip(self, email), fields(host = %self.host, to = %email.to))]
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        let message = Self::build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(from: &str, to: &str) -> OutboundEmail {
        OutboundEmail {
            from: from.into(),
            to: to.into(),
            subject: "Subject".into(),
            body: "Body".into(),
        }
    }

    #[test]
    fn test_build_message_accepts_display_names() {
        let message = SmtpMailer::build_message(&email(
            "Vet Clinic <clinic@example.com>",
            "owner@example.com",
        ));
        assert!(message.is_ok());
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let result = SmtpMailer::build_message(&email("clinic@example.com", "not-an-address"));
        assert!(matches!(
            result,
            Err(TransportError::InvalidAddress { ref address, .. }) if address == "not-an-address"
        ));
    }
}
