//! Invoice total calculation policies.
//!
//! Each policy is a pure function from a subtotal and an ordered list of
//! opaque parameters to a total rounded to cents. Policies are registered in a
//! [`CalculatorRegistry`] keyed by their discriminator, with one configured as
//! the default.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::value_objects::money::with_tax;
use crate::domain::value_objects::CalculationPolicy;

/// Billing calculation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    #[error("unsupported calculation policy: {0}")]
    UnsupportedPolicy(String),

    #[error("invalid calculation parameter: {0}")]
    InvalidParameter(String),

    #[error("amount out of range: {0}")]
    Overflow(String),
}

/// Tax `net`, reporting amounts too large to represent.
fn taxed(net: Decimal) -> Result<Decimal, BillingError> {
    with_tax(net).ok_or_else(|| BillingError::Overflow(format!("total for subtotal {net}")))
}

/// A named rule deriving an invoice total from a subtotal.
pub trait BillingCalculator: Send + Sync {
    /// Discriminator this calculator is registered under.
    fn policy(&self) -> CalculationPolicy;

    /// Compute the total for `subtotal`.
    fn compute_total(&self, subtotal: Decimal, parameters: &[Value]) -> Result<Decimal, BillingError>;
}

/// Flat 19% tax. Parameters are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCalculator;

impl BillingCalculator for StandardCalculator {
    fn policy(&self) -> CalculationPolicy {
        CalculationPolicy::STANDARD
    }

    fn compute_total(&self, subtotal: Decimal, _parameters: &[Value]) -> Result<Decimal, BillingError> {
        taxed(subtotal)
    }
}

/// Percentage discount on the subtotal, then 19% tax on the discounted amount.
///
/// The first parameter is the discount percentage (`10` means 10%); it
/// defaults to zero when absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountCalculator;

impl DiscountCalculator {
    fn discount_percent(parameters: &[Value]) -> Result<Decimal, BillingError> {
        let pct = match parameters.first() {
            None | Some(Value::Null) => return Ok(Decimal::ZERO),
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            Some(Value::String(s)) => parse_decimal(s),
            Some(_) => None,
        }
        .ok_or_else(|| {
            BillingError::InvalidParameter(format!(
                "discount percentage must be numeric, got {}",
                parameters[0]
            ))
        })?;

        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            return Err(BillingError::InvalidParameter(format!(
                "discount percentage must be between 0 and 100, got {pct}"
            )));
        }

        Ok(pct)
    }
}

impl BillingCalculator for DiscountCalculator {
    fn policy(&self) -> CalculationPolicy {
        CalculationPolicy::DISCOUNT
    }

    fn compute_total(&self, subtotal: Decimal, parameters: &[Value]) -> Result<Decimal, BillingError> {
        let pct = Self::discount_percent(parameters)?;
        let discount = subtotal
            .checked_mul(pct / Decimal::ONE_HUNDRED)
            .ok_or_else(|| BillingError::Overflow(format!("discount on subtotal {subtotal}")))?;
        taxed(subtotal - discount)
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Calculators keyed by policy discriminator.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct CalculatorRegistry {
    calculators: HashMap<CalculationPolicy, Arc<dyn BillingCalculator>>,
    default_policy: CalculationPolicy,
}

impl CalculatorRegistry {
    /// Register calculators and pick the default by discriminator.
    pub fn new(
        calculators: Vec<Arc<dyn BillingCalculator>>,
        default_policy: &str,
    ) -> Result<Self, BillingError> {
        let calculators: HashMap<_, _> = calculators
            .into_iter()
            .map(|calc| (calc.policy(), calc))
            .collect();

        let default_policy = CalculationPolicy::new(default_policy);
        if !calculators.contains_key(&default_policy) {
            return Err(BillingError::UnsupportedPolicy(default_policy.to_string()));
        }

        Ok(Self {
            calculators,
            default_policy,
        })
    }

    /// Registry holding the STANDARD and DISCOUNT policies.
    pub fn builtin(default_policy: &str) -> Result<Self, BillingError> {
        Self::new(
            vec![Arc::new(StandardCalculator), Arc::new(DiscountCalculator)],
            default_policy,
        )
    }

    /// Look up a calculator, ignoring case.
    pub fn resolve(&self, policy: &str) -> Result<Arc<dyn BillingCalculator>, BillingError> {
        self.calculators
            .get(&CalculationPolicy::new(policy))
            .cloned()
            .ok_or_else(|| BillingError::UnsupportedPolicy(policy.to_string()))
    }

    /// The calculator wired as default.
    pub fn default_calculator(&self) -> Arc<dyn BillingCalculator> {
        // Presence is checked in `new`.
        Arc::clone(&self.calculators[&self.default_policy])
    }

    pub fn default_policy(&self) -> &CalculationPolicy {
        &self.default_policy
    }

    /// Registered policies, sorted.
    pub fn policies(&self) -> Vec<CalculationPolicy> {
        let mut policies: Vec<_> = self.calculators.keys().cloned().collect();
        policies.sort();
        policies
    }
}

impl std::fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorRegistry")
            .field("policies", &self.policies())
            .field("default_policy", &self.default_policy)
            .finish()
    }
}
