//! Fee calculation
//!
//! One flat rate, charged to the buyer only. Reservation at placement and
//! cost at settlement both go through [`FeeSchedule::breakdown`] so the two
//! computations can never disagree on rounding.

use crate::numeric::{quantize, Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat fee schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fraction of gross volume charged to the buyer (0.015 = 1.5%).
    pub rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            rate: Decimal::new(15, 3), // 1.5%
        }
    }
}

impl FeeSchedule {
    /// Create a schedule with a custom rate.
    ///
    /// # Panics
    /// Panics if the rate is negative.
    pub fn new(rate: Decimal) -> Self {
        assert!(rate >= Decimal::ZERO, "fee rate must be non-negative");
        Self { rate }
    }

    /// Gross volume, buyer fee and their sum for a fill at `price`.
    ///
    /// Both figures are truncated to the canonical scale. Volume and fee are
    /// monotone in price, so a reservation computed at a buy order's limit
    /// price always covers the cost of an execution at or below that limit.
    pub fn breakdown(&self, price: Price, quantity: Quantity) -> FeeBreakdown {
        let volume = quantize(price.as_decimal() * quantity.as_decimal());
        let fee = quantize(volume * self.rate);
        FeeBreakdown { volume, fee }
    }
}

/// Result of a fee computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub volume: Decimal,
    pub fee: Decimal,
}

impl FeeBreakdown {
    /// Volume plus fee: what the buyer pays in total.
    pub fn total(&self) -> Decimal {
        self.volume + self.fee
    }
}
