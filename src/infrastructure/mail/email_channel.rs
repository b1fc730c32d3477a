//! Email delivery channel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::transport::{MailTransport, OutboundEmail, TransportError};
use crate::config::MailSettings;
use crate::domain::{ChannelKind, Delivery, DeliveryChannel, DeliveryError, Notification};

/// Delivers notifications as plain-text email through a [`MailTransport`].
pub struct EmailChannel {
    transport: Arc<dyn MailTransport>,
    from: String,
    enabled: bool,
}

impl EmailChannel {
    /// Create a new email channel.
    pub fn new(transport: Arc<dyn MailTransport>, from: impl Into<String>, enabled: bool) -> Self {
        Self {
            transport,
            from: from.into(),
            enabled,
        }
    }

    /// Create a channel using the sender identity and switch from settings.
    pub fn from_settings(settings: &MailSettings, transport: Arc<dyn MailTransport>) -> Self {
        Self::new(transport, settings.from.clone(), settings.enabled)
    }

    fn build_email(&self, notification: &Notification) -> OutboundEmail {
        OutboundEmail {
            from: self.from.clone(),
            to: notification.recipient().trim().to_string(),
            subject: notification.subject().to_string(),
            body: notification.body().to_string(),
        }
    }
}

impl From<TransportError> for DeliveryError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidAddress { address, reason } => {
                DeliveryError::InvalidAddress { address, reason }
            }
            TransportError::Build(msg) => DeliveryError::Build(msg),
            TransportError::Send(msg) | TransportError::Setup(msg) => DeliveryError::Transport(msg),
        }
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::EMAIL
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notification: &Notification) -> Result<Delivery, DeliveryError> {
        if !self.enabled {
            warn!(
                subject = %notification.subject(),
                "Email delivery disabled; message not sent"
            );
            return Ok(Delivery::Suppressed);
        }

        if !notification.has_recipient() {
            return Err(DeliveryError::EmptyRecipient);
        }

        let email = self.build_email(notification);
        self.transport.deliver(&email).await?;

        info!(
            recipient = %email.to,
            transport = self.transport.name(),
            "Email sent"
        );
        Ok(Delivery::Sent)
    }
}
