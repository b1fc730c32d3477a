//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus MAIL_* shortcuts)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vet_clinic::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Mail enabled: {}", settings.mail.enabled);
//! ```

mod settings;

pub use settings::*;
