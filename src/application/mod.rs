//! Application Layer
//!
//! Contains business logic services and data transfer objects (DTOs).
//! This layer orchestrates the flow of data between callers and the
//! domain layer, and isolates notification failures from primary writes.

pub mod services;
