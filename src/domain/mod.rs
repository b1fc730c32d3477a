//! # Domain Layer
//!
//! The domain layer contains the core business logic of the clinic
//! back-office. It is independent of any external frameworks or
//! infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Owners, pets, appointments, invoices and notifications
//! - **value_objects**: Discriminators and money helpers
//! - **services**: Billing calculation policies
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure layers
//! - Repository and delivery channel traits define external contracts
//! - Monetary arithmetic is decimal-only

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use value_objects::*;
