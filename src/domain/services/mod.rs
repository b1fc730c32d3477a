//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong to
//! a single entity.
//!
//! ## Services
//!
//! - **BillingCalculator**: Invoice total calculation policies and their registry

mod billing_calculator;

pub use billing_calculator::*;
