//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **ChannelKind**: notification channel discriminator
//! - **CalculationPolicy**: invoice calculation policy discriminator
//! - **money**: decimal rounding and tax helpers

mod calculation_policy;
mod channel_kind;
pub mod money;

pub use calculation_policy::*;
pub use channel_kind::*;
