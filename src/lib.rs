//! # Vet Clinic Library
//!
//! Back-office core for a veterinary clinic:
//! - Appointment booking with owner notifications
//! - Pluggable notification channels with best-effort delivery
//! - Invoice issuing with selectable calculation policies
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities, repository and channel traits, billing policies
//! - **Application Layer**: Services, the notification dispatcher and the appointment facade
//! - **Infrastructure Layer**: Mail transports, in-memory repositories, metrics
//!
//! ## Module Structure
//!
//! ```text
//! vet_clinic/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities, value objects, and traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Mail, repositories and metrics
//! +-- shared/         Common utilities (errors, snowflake IDs, dates)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
