//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Every monetary and quantity value carries at most eight fractional digits;
//! amounts produced by multiplication are truncated back to that scale so
//! settlement comparisons are exact.

use crate::errors::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits carried by prices, quantities and USD amounts.
pub const SCALE: u32 = 8;

/// Truncate a decimal toward zero to the canonical scale.
pub fn quantize(value: Decimal) -> Decimal {
    value.trunc_with_scale(SCALE)
}

fn fits_scale(value: Decimal) -> bool {
    value.normalize().scale() <= SCALE
}

/// Limit price of an order: strictly positive, at most eight fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Validate and wrap a decimal price.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::InvalidPrice(format!(
                "price must be positive, got {value}"
            )));
        }
        if !fits_scale(value) {
            return Err(ValidationError::InvalidPrice(format!(
                "price {value} exceeds {SCALE} fractional digits"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Parse a price from its decimal string representation.
    pub fn from_str(s: &str) -> Result<Self, ValidationError> {
        let value = Decimal::from_str_exact(s)
            .map_err(|e| ValidationError::InvalidPrice(format!("{s}: {e}")))?;
        Self::try_new(value)
    }

    /// Whole-dollar price, mostly for tests and fixtures.
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order quantity: strictly positive, at most eight fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Validate and wrap a decimal quantity.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::InvalidQuantity(format!(
                "quantity must be positive, got {value}"
            )));
        }
        if !fits_scale(value) {
            return Err(ValidationError::InvalidQuantity(format!(
                "quantity {value} exceeds {SCALE} fractional digits"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Parse a quantity from its decimal string representation.
    pub fn from_str(s: &str) -> Result<Self, ValidationError> {
        let value = Decimal::from_str_exact(s)
            .map_err(|e| ValidationError::InvalidQuantity(format!("{s}: {e}")))?;
        Self::try_new(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_truncates_toward_zero() {
        let value = Decimal::from_str_exact("1.234567891").unwrap();
        assert_eq!(quantize(value), Decimal::from_str_exact("1.23456789").unwrap());
    }

    #[test]
    fn test_price_from_str() {
        let price = Price::from_str("50000.5").unwrap();
        assert_eq!(price.as_decimal(), Decimal::from_str_exact("50000.5").unwrap());
    }

    #[test]
    fn test_price_rejects_zero_and_negative() {
        assert!(Price::try_new(Decimal::ZERO).is_err());
        assert!(Price::from_str("-1").is_err());
    }

    #[test]
    fn test_price_rejects_excess_scale() {
        // nine significant fractional digits
        assert!(Price::from_str("0.000000001").is_err());
    }

    #[test]
    fn test_price_accepts_trailing_zeros() {
        let price = Price::from_str("1.5000000000").unwrap();
        assert_eq!(price, Price::from_str("1.5").unwrap());
    }

    #[test]
    fn test_quantity_minimum_tick() {
        assert!(Quantity::from_str("0.00000001").is_ok());
        assert!(Quantity::from_str("0").is_err());
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::from_u64(100) < Price::from_u64(101));
        assert!(Price::from_str("99.99999999").unwrap() < Price::from_u64(100));
    }

    #[test]
    fn test_serialization_round_trip() {
        let qty = Quantity::from_str("2.5").unwrap();
        let json = serde_json::to_string(&qty).unwrap();
        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(qty, back);
    }
}
