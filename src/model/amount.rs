//! Amount type for signed monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. The sign of the
//! value is the only income/expense signal the ledger carries: negative amounts
//! are expenses, positive amounts are income.

use crate::model::Polarity;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a signed dollar amount.
///
/// On the wire an amount is a bare JSON number (`-89.99`). For human output it
/// formats with a dollar sign and thousands separators. Parsing is lenient and
/// accepts an optional leading dollar sign and comma separators.
///
/// # Examples
///
/// ```
/// # use wallet_sync::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,200.00").unwrap();
/// assert_eq!(amount.to_string(), "-$1,200.00");
/// assert!(amount.is_expense());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is an expense (strictly negative).
    pub fn is_expense(&self) -> bool {
        self.0.is_sign_negative() && !self.is_zero()
    }

    /// Returns true if the amount is income (strictly positive).
    pub fn is_income(&self) -> bool {
        self.0.is_sign_positive() && !self.is_zero()
    }

    /// The polarity implied by the sign, or `None` for the ambiguous zero.
    pub fn polarity(&self) -> Option<Polarity> {
        if self.is_zero() {
            None
        } else if self.is_expense() {
            Some(Polarity::Expense)
        } else {
            Some(Polarity::Income)
        }
    }

    /// The magnitude of the amount.
    pub fn abs(&self) -> Amount {
        Amount(self.0.abs())
    }

    /// Forces the sign to match `polarity`, regardless of how the value was
    /// entered. Entry forms collect a magnitude plus an expense/income choice.
    pub fn with_polarity(self, polarity: Polarity) -> Amount {
        match polarity {
            Polarity::Expense => Amount(-self.0.abs()),
            Polarity::Income => Amount(self.0.abs()),
        }
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Strip a dollar sign, which may follow the minus sign
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Strip thousands separators
        let without_commas = without_dollar.replace(',', "");

        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_expense() {
            ("-", self.0.abs())
        } else {
            ("", self.0)
        };
        write!(
            f,
            "{sign}${}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The wire format is a plain JSON number
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            // Route numbers through their decimal string form so that values
            // like -25.67 do not pick up binary float artifacts.
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                .map(Amount)
                .map_err(serde::de::Error::custom),
            serde_json::Value::String(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected a number for an amount, got {other}"
            ))),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        let amount = Amount::from_str("$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("-$60,000.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-60000.00").unwrap());
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_display_expense() {
        let amount = Amount::from_str("-87.43").unwrap();
        assert_eq!(amount.to_string(), "-$87.43");
    }

    #[test]
    fn test_display_income() {
        let amount = Amount::from_str("4500").unwrap();
        assert_eq!(amount.to_string(), "$4,500.00");
    }

    #[test]
    fn test_serialize_as_number() {
        let amount = Amount::from_str("-89.99").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "-89.99");
    }

    #[test]
    fn test_deserialize_number() {
        let amount: Amount = serde_json::from_str("-32.5").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-32.5").unwrap());
    }

    #[test]
    fn test_deserialize_string() {
        let amount: Amount = serde_json::from_str("\"-$1,200.00\"").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-1200.00").unwrap());
    }

    #[test]
    fn test_deserialize_rejects_non_numbers() {
        let result = serde_json::from_str::<Amount>("true");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_has_no_polarity() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_expense());
        assert!(!zero.is_income());
        assert_eq!(zero.polarity(), None);
    }

    #[test]
    fn test_polarity() {
        assert_eq!(
            Amount::from_str("-5").unwrap().polarity(),
            Some(Polarity::Expense)
        );
        assert_eq!(
            Amount::from_str("5").unwrap().polarity(),
            Some(Polarity::Income)
        );
    }

    #[test]
    fn test_with_polarity() {
        let magnitude = Amount::from_str("45.00").unwrap();
        assert!(magnitude.with_polarity(Polarity::Expense).is_expense());
        assert!(magnitude.with_polarity(Polarity::Income).is_income());

        // Already-signed input keeps only its magnitude
        let negative = Amount::from_str("-45.00").unwrap();
        assert!(negative.with_polarity(Polarity::Income).is_income());
    }

    #[test]
    fn test_abs() {
        let amount = Amount::from_str("-12.40").unwrap();
        assert_eq!(amount.abs(), Amount::from_str("12.40").unwrap());
    }
}
