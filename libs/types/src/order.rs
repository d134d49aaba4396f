//! Order lifecycle types
//!
//! An order is created `Open` with its reservation already applied, and moves
//! exactly once to `Filled` (by settlement) or `Cancelled` (by its owner).

use crate::ids::{AccountId, OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order status.
///
/// `Filled` and `Cancelled` are terminal; there are no other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Resting, eligible for matching or cancellation
    Open,
    /// Completely matched (terminal)
    Filled,
    /// Cancelled by the owner (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{label}")
    }
}

/// A limit order together with its reservation metadata.
///
/// `reserved_usd` is the USD debited from the owner at placement and is
/// non-zero only while a buy order is open; a sell order's reservation lives
/// on the owner's asset holding instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub status: OrderStatus,
    pub reserved_usd: Decimal,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl Order {
    /// Create a new open order.
    pub fn new(
        account_id: AccountId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        reserved_usd: Decimal,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            account_id,
            symbol,
            side,
            price,
            quantity,
            status: OrderStatus::Open,
            reserved_usd,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, OrderStatus::Open)
    }

    /// Transition to `Filled`. The reservation is fully consumed by
    /// settlement (cost taken, remainder refunded), so it drops to zero.
    ///
    /// # Panics
    /// Panics if the order is not open; callers check status under the
    /// order's exclusive hold before transitioning.
    pub fn fill(&mut self, timestamp: i64) {
        assert!(self.is_open(), "cannot fill a non-open order");
        self.status = OrderStatus::Filled;
        self.reserved_usd = Decimal::ZERO;
        self.updated_at = timestamp;
    }

    /// Transition to `Cancelled`, releasing the reservation record.
    ///
    /// # Panics
    /// Panics if the order is not open; callers check status under the
    /// order's exclusive hold before transitioning.
    pub fn cancel(&mut self, timestamp: i64) {
        assert!(self.is_open(), "cannot cancel a non-open order");
        self.status = OrderStatus::Cancelled;
        self.reserved_usd = Decimal::ZERO;
        self.updated_at = timestamp;
    }
}
