//! In-memory mail transport.
//!
//! Captures outbound email instead of sending it. Used in development and by
//! tests to observe what the email channel transmitted.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::transport::{MailTransport, OutboundEmail, TransportError};

/// Transport that records every delivered message.
#[derive(Default)]
pub struct MemoryOutbox {
    sent: Mutex<Vec<OutboundEmail>>,
    failure: Mutex<Option<String>>,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    /// Make subsequent deliveries fail with `reason` (or succeed again with `None`).
    pub fn set_failure(&self, reason: Option<&str>) {
        *self.failure.lock() = reason.map(str::to_string);
    }
}

#[async_trait]
impl MailTransport for MemoryOutbox {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn deliver(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        if let Some(reason) = self.failure.lock().clone() {
            return Err(TransportError::Send(reason));
        }

        debug!(to = %email.to, subject = %email.subject, "Captured email in outbox");
        self.sent.lock().push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "clinic@example.com".into(),
            to: "owner@example.com".into(),
            subject: "Hi".into(),
            body: "Body".into(),
        }
    }

    #[tokio::test]
    async fn test_records_deliveries() {
        let outbox = MemoryOutbox::new();
        outbox.deliver(&email()).await.unwrap();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox.sent()[0], email());

        outbox.clear();
        assert!(outbox.is_empty());
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let outbox = MemoryOutbox::new();
        outbox.set_failure(Some("relay down"));
        let err = outbox.deliver(&email()).await.unwrap_err();
        assert_eq!(err, TransportError::Send("relay down".into()));
        assert!(outbox.is_empty());

        outbox.set_failure(None);
        assert!(outbox.deliver(&email()).await.is_ok());
    }
}
