//! Mail Infrastructure
//!
//! The email delivery channel and the transports it can wrap:
//! - **SmtpMailer** - SMTP relay via `lettre`
//! - **MemoryOutbox** - in-process capture for development and tests

mod email_channel;
mod outbox;
mod smtp;
mod transport;

pub use email_channel::EmailChannel;
pub use outbox::MemoryOutbox;
pub use smtp::SmtpMailer;
pub use transport::{MailTransport, OutboundEmail, TransportError};

#[cfg(test)]
pub use transport::MockMailTransport;
