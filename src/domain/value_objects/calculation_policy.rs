//! Invoice calculation policy discriminator.

use std::borrow::Cow;
use std::fmt;

/// Key identifying a billing calculator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalculationPolicy(Cow<'static, str>);

impl CalculationPolicy {
    /// Flat tax on the subtotal.
    pub const STANDARD: CalculationPolicy = CalculationPolicy(Cow::Borrowed("STANDARD"));

    /// Percentage discount on the subtotal, then tax.
    pub const DISCOUNT: CalculationPolicy = CalculationPolicy(Cow::Borrowed("DISCOUNT"));

    /// Normalize a raw discriminator.
    pub fn new(raw: &str) -> Self {
        Self(Cow::Owned(raw.trim().to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CalculationPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl From<&str> for CalculationPolicy {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for CalculationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
