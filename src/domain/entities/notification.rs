//! Notification message and the delivery channel contract.
//!
//! A [`Notification`] is built fresh for every send and consumed by a single
//! dispatch; it is never persisted. Channels implement [`DeliveryChannel`] in
//! the infrastructure layer.

use async_trait::async_trait;

use crate::domain::value_objects::ChannelKind;

/// Sender signature appended to clinic messages.
const SIGNATURE: &str = "Vet Clinic - Veterinary Management System";

/// A channel-agnostic outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    recipient: String,
    subject: String,
    body: String,
    channel: Option<String>,
}

impl Notification {
    /// Build a message with no explicit channel.
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            channel: None,
        }
    }

    /// Route the message through a specific channel discriminator.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Raw channel discriminator as supplied, if any.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Whether the recipient is present and not just whitespace.
    pub fn has_recipient(&self) -> bool {
        !self.recipient.trim().is_empty()
    }

    /// Confirmation sent after an appointment is booked.
    pub fn appointment_confirmation(
        email: &str,
        pet_name: &str,
        scheduled_at: &str,
        reason: &str,
    ) -> Self {
        let body = format!(
            "VETERINARY APPOINTMENT CONFIRMATION\n\n\
             Dear owner,\n\n\
             An appointment has been scheduled for your pet {pet_name}.\n\n\
             Date: {scheduled_at}\n\
             Reason: {reason}\n\n\
             Please arrive 10 minutes before your appointment.\n\n\
             Kind regards,\n\
             {SIGNATURE}\n"
        );

        Self::new(email, "Veterinary Appointment Confirmation - Vet Clinic", body)
            .with_channel(ChannelKind::EMAIL.as_str())
    }

    /// Notice sent when an appointment moves to a new date or time.
    pub fn appointment_rescheduled(
        email: &str,
        pet_name: &str,
        scheduled_at: &str,
        reason: &str,
    ) -> Self {
        let body = format!(
            "Dear owner,\n\n\
             The appointment for {pet_name} has been rescheduled.\n\
             New date: {scheduled_at}\n\
             Reason: {reason}\n\n\
             Kind regards,\n\
             {SIGNATURE}\n"
        );

        Self::new(email, "Change to your Veterinary Appointment", body)
            .with_channel(ChannelKind::EMAIL.as_str())
    }

    /// Message used to verify mail configuration end to end.
    pub fn test_message(email: &str) -> Self {
        let body = format!(
            "This is a test message from Vet Clinic.\n\n\
             If you received it, notification delivery is configured correctly.\n\n\
             {SIGNATURE}\n"
        );

        Self::new(email, "Test Notification - Vet Clinic", body)
            .with_channel(ChannelKind::EMAIL.as_str())
    }
}

/// Result of a channel send that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the transport
    Sent,
    /// Channel disabled; nothing was transmitted
    Suppressed,
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Suppressed => "suppressed",
        }
    }
}

/// Reasons a channel could not deliver a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("recipient is empty")]
    EmptyRecipient,

    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("message could not be built: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// One concrete way of transmitting a notification.
///
/// Implementations make at most one transmission attempt per call and never
/// retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Discriminator this channel is registered under.
    fn kind(&self) -> ChannelKind;

    /// Whether transmissions are currently enabled.
    fn is_enabled(&self) -> bool;

    /// Transmit a notification.
    async fn send(&self, notification: &Notification) -> Result<Delivery, DeliveryError>;
}
