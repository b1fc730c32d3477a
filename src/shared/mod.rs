//! Shared Utilities
//!
//! Common utilities used across all layers.

pub mod date_format;
pub mod error;
pub mod snowflake;
pub mod validation;
