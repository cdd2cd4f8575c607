//! Text-backed price representation.
//!
//! Prices travel as JSON strings so display never goes through floating
//! point. The text is only parsed (via `rust_decimal`) when a form value has
//! to be validated or shown in a numeric input.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number (got '{0}')")]
    NotANumber(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A price amount stored exactly as entered.
///
/// ## Examples
///
/// ```
/// use phone_catalog_core::Price;
///
/// let price = Price::parse(" 799.50 ").unwrap();
/// assert_eq!(price.as_str(), "799.50");
///
/// assert!(Price::parse("").is_err());
/// assert!(Price::parse("abc").is_err());
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    /// Parse a user-entered price.
    ///
    /// Surrounding whitespace is trimmed; the remaining text must be a
    /// non-negative decimal number and is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a price from backend text without validation.
    #[must_use]
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the price text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Backends that store prices as JSON numbers are tolerated; the number is
// kept as its shortest textual form.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match RawPrice::deserialize(deserializer)? {
            RawPrice::Text(s) => Self(s),
            RawPrice::Integer(n) => Self(n.to_string()),
            RawPrice::Float(n) => Self(n.to_string()),
        })
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
