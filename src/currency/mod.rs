//! Decimal amount parsing and presentation-boundary formatting.
//!
//! Amounts are accumulated as exact [`Decimal`] values everywhere in the core;
//! the helpers here are the only place where rounding happens.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Number of fractional digits shown for currency values.
pub const DISPLAY_SCALE: u32 = 2;
/// Number of fractional digits shown for percentages.
pub const PERCENT_SCALE: u32 = 1;
/// Most fractional digits an amount may carry.
pub const AMOUNT_SCALE: u32 = 2;
/// Largest accepted amount or budget limit: one trillion.
///
/// With [`AMOUNT_SCALE`] this keeps every amount within 15 significant digits,
/// which survive the `f64` JSON encoding exactly, and leaves aggregation far
/// below the `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

const DEFAULT_SYMBOL: &str = "$";

/// Parses user supplied text into a strictly positive amount.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("amount is required"));
    }
    let value = Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::validation(format!("`{trimmed}` is not a valid amount")))?;
    ensure_amount_bounds(value, "amount")
}

/// Checks that a stored or entered value is positive, at most [`MAX_AMOUNT`]
/// and has no more than [`AMOUNT_SCALE`] fractional digits.
pub fn ensure_amount_bounds(value: Decimal, label: &str) -> Result<Decimal> {
    let value = ensure_positive(value, label)?;
    if value > MAX_AMOUNT {
        return Err(LedgerError::validation(format!(
            "{label} must not exceed {}",
            plain_amount(MAX_AMOUNT)
        )));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::validation(format!(
            "{label} allows at most {AMOUNT_SCALE} decimal places"
        )));
    }
    Ok(value)
}

/// Rejects zero and negative values.
pub fn ensure_positive(value: Decimal, label: &str) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "{label} must be greater than zero"
        )));
    }
    Ok(value)
}

/// Rounds half away from zero and pads to exactly `scale` digits.
pub fn round_display(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Shortest textual form of an amount (`1000`, `12.5`), as stored in exports.
pub fn plain_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Formats a percentage such as `71.4%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", round_display(value, PERCENT_SCALE))
}

/// Symbol-prefixed currency formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormatter {
    pub symbol: String,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL)
    }
}

impl CurrencyFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// `$1234.50`, or `-$12.00` for negative values.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = round_display(amount.abs(), DISPLAY_SCALE);
        if amount.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{}", self.symbol, rounded)
        } else {
            format!("{}{}", self.symbol, rounded)
        }
    }

    /// Prefixes the absolute amount with an explicit `+` or `-`.
    pub fn format_signed(&self, amount: Decimal, positive: bool) -> String {
        let sign = if positive { '+' } else { '-' };
        format!("{sign}{}", self.format(amount.abs()))
    }
}
