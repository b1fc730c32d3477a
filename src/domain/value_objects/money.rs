//! Monetary arithmetic helpers.
//!
//! All amounts are base-10 decimals; binary floating point never touches money.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept on stored amounts.
pub const MONEY_SCALE: u32 = 2;

/// Value-added tax as a fraction (0.19).
pub fn tax_rate() -> Decimal {
    Decimal::new(19, 2)
}

/// Value-added tax as the percentage stored on invoices (19.00).
pub fn tax_rate_percent() -> Decimal {
    Decimal::new(1900, 2)
}

/// Round to cents using round-half-up, always yielding two fractional digits.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Apply tax to a net amount and round to cents.
///
/// Returns `None` when the taxed amount does not fit in a `Decimal`.
pub fn with_tax(net: Decimal) -> Option<Decimal> {
    let tax = net.checked_mul(tax_rate())?;
    net.checked_add(tax).map(round_money)
}
