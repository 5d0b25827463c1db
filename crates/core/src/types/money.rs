//! Money normalization and locale-aware display.
//!
//! Upstream amounts arrive as JSON numbers, numeric strings, `null`, or not at
//! all. [`MoneyAmount::normalize`] accepts any of them and never fails: an
//! amount that cannot be parsed becomes zero.
//!
//! ```rust
//! use receipt_desk_core::{Locale, MoneyAmount};
//! use serde_json::json;
//!
//! let amount = MoneyAmount::normalize(Some(&json!("1234")), "JPY");
//! assert_eq!(amount.format(Locale::JaJp), "￥1,234");
//!
//! let broken = MoneyAmount::normalize(Some(&json!("n/a")), "JPY");
//! assert!(broken.value.is_zero());
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::locale::Locale;

/// Errors raised while parsing a monetary amount.
///
/// Callers of [`MoneyAmount::normalize`] never see this; it is recovered as
/// zero. [`parse_amount`] exposes it for code that wants to know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount is not a decimal number.
    #[error("Invalid money value: {0:?}")]
    InvalidValue(String),
}

/// A monetary amount with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyAmount {
    /// Amount in the currency's standard unit (yen, dollars, not cents).
    pub value: Decimal,
    /// Upper-case ISO 4217 currency code.
    pub currency: String,
}

impl MoneyAmount {
    /// Create an amount from an already-parsed value.
    #[must_use]
    pub fn new(value: Decimal, currency: &str) -> Self {
        Self {
            value,
            currency: normalize_currency(currency),
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: &str) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Normalize a raw upstream amount.
    ///
    /// Numbers and numeric strings are parsed exactly; `null`, a missing
    /// value, or anything non-numeric yields zero.
    #[must_use]
    pub fn normalize(raw: Option<&Value>, currency: &str) -> Self {
        let value = match raw {
            None | Some(Value::Null) => Decimal::ZERO,
            Some(Value::Number(n)) => parse_amount(&n.to_string()).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Falling back to zero for numeric amount");
                Decimal::ZERO
            }),
            Some(Value::String(s)) => parse_amount(s).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Falling back to zero for string amount");
                Decimal::ZERO
            }),
            Some(other) => {
                tracing::debug!(raw = %other, "Non-numeric money value, using zero");
                Decimal::ZERO
            }
        };
        Self::new(value, currency)
    }

    /// This amount multiplied by an item quantity.
    ///
    /// A product outside the `Decimal` range yields zero.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        let value = self
            .value
            .checked_mul(Decimal::from(quantity))
            .unwrap_or_else(|| {
                tracing::debug!(
                    value = %self.value,
                    quantity,
                    "Line total out of range, using zero"
                );
                Decimal::ZERO
            });
        Self {
            value,
            currency: self.currency.clone(),
        }
    }

    /// Render for display, e.g. `￥1,234` (ja-JP) or `1.234,50 €` (de-DE).
    ///
    /// The amount is rounded half away from zero to the currency's minor
    /// units; yen and other zero-decimal currencies show no fraction.
    #[must_use]
    pub fn format(&self, locale: Locale) -> String {
        let digits = minor_units(&self.currency);
        let rounded = self
            .value
            .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let plain = format!("{:.*}", digits as usize, rounded.abs());

        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
        let mut number = group_digits(int_part, locale.grouping_separator());
        if !frac_part.is_empty() {
            number.push_str(locale.decimal_separator());
            number.push_str(frac_part);
        }

        let symbol = currency_symbol(&self.currency, locale);
        let sign = if negative { "-" } else { "" };
        if symbol.is_empty() {
            format!("{sign}{number}")
        } else if locale.symbol_after_amount() {
            format!("{sign}{number} {symbol}")
        } else if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            format!("{sign}{symbol} {number}")
        } else {
            format!("{sign}{symbol}{number}")
        }
    }
}

/// Parse a decimal amount from text.
///
/// Accepts plain decimals (`"12.50"`) and scientific notation (`"1e3"`).
///
/// # Errors
///
/// Returns `MoneyError::InvalidValue` if the text is not a number.
pub fn parse_amount(raw: &str) -> Result<Decimal, MoneyError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| MoneyError::InvalidValue(raw.to_string()))
}

/// Number of fractional digits shown for a currency (ISO 4217 minor units).
#[must_use]
pub fn minor_units(currency: &str) -> u32 {
    match currency {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "PYG" => 0,
        "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "IQD" | "LYD" => 3,
        _ => 2,
    }
}

fn currency_symbol(currency: &str, locale: Locale) -> &str {
    match (currency, locale) {
        ("JPY", Locale::JaJp) => "￥",
        ("JPY", _) => "¥",
        ("USD", Locale::EnUs) => "$",
        ("USD", _) => "US$",
        ("EUR", _) => "€",
        ("GBP", _) => "£",
        ("CAD", _) => "CA$",
        ("AUD", _) => "A$",
        ("KRW", _) => "₩",
        (code, _) => code,
    }
}

fn normalize_currency(currency: &str) -> String {
    currency.trim().to_ascii_uppercase()
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
