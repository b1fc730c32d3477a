//! Mail transport contract.
//!
//! The email channel hands fully addressed messages to a [`MailTransport`];
//! endpoints and credentials are owned by the implementation.

use async_trait::async_trait;

/// A fully addressed plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail transport errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("failed to send message: {0}")]
    Send(String),

    #[error("transport setup failed: {0}")]
    Setup(String),
}

/// Outbound mail transport.
///
/// One call is one transmission attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Transmit a message.
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}
