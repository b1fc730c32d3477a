//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Mail delivery channel and transports (SMTP, in-memory outbox)
//! - In-memory repositories
//! - Prometheus metrics

pub mod mail;
pub mod metrics;
pub mod repositories;
