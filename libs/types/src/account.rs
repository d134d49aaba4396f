//! Account and holding types
//!
//! An account owns a spendable USD balance and a lazily-created holding per
//! asset symbol. Buy-side reservations debit the balance directly (tracked on
//! the order); sell-side reservations move quantity from a holding's
//! `available` into `reserved`.

use crate::errors::AccountError;
use crate::ids::{AccountId, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-symbol asset position, split between tradable and reserved quantity.
///
/// Invariant: both quantities are non-negative. `available + reserved` only
/// changes through deposits, placement, cancellation, or settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: Symbol,
    pub available: Decimal,
    pub reserved: Decimal,
}

impl Holding {
    /// Create an empty holding.
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            available: Decimal::ZERO,
            reserved: Decimal::ZERO,
        }
    }

    /// Credit tradable quantity (deposit or trade settlement).
    pub fn credit(&mut self, quantity: Decimal) {
        assert!(quantity >= Decimal::ZERO, "credit must be non-negative");
        self.available += quantity;
    }

    /// Move quantity from `available` to `reserved` for an open sell order.
    pub fn reserve(&mut self, quantity: Decimal) -> Result<(), AccountError> {
        if self.available < quantity {
            return Err(AccountError::InsufficientAsset {
                symbol: self.symbol.clone(),
                requested: quantity,
                available: self.available,
            });
        }
        self.available -= quantity;
        self.reserved += quantity;
        Ok(())
    }

    /// Move quantity back from `reserved` to `available` (cancellation).
    pub fn release(&mut self, quantity: Decimal) -> Result<(), AccountError> {
        if self.reserved < quantity {
            return Err(AccountError::InvariantViolation {
                symbol: self.symbol.clone(),
            });
        }
        self.reserved -= quantity;
        self.available += quantity;
        Ok(())
    }

    /// Deduct reserved quantity handed over to the buyer at settlement.
    pub fn settle_reserved(&mut self, quantity: Decimal) -> Result<(), AccountError> {
        if self.reserved < quantity {
            return Err(AccountError::InvariantViolation {
                symbol: self.symbol.clone(),
            });
        }
        self.reserved -= quantity;
        Ok(())
    }

    pub fn total(&self) -> Decimal {
        self.available + self.reserved
    }
}

/// An account: spendable USD balance plus per-symbol holdings.
///
/// Holdings live inside the account record so one exclusive hold covers all
/// of an account's cash and asset state during an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub holdings: HashMap<Symbol, Holding>,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl Account {
    /// Create a new account seeded with an opening USD balance.
    pub fn new(opening_balance: Decimal, timestamp: i64) -> Self {
        assert!(
            opening_balance >= Decimal::ZERO,
            "opening balance must be non-negative"
        );
        Self {
            account_id: AccountId::new(),
            balance: opening_balance,
            holdings: HashMap::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Credit spendable USD (deposit, cancellation refund, sale proceeds).
    pub fn credit_usd(&mut self, amount: Decimal) {
        assert!(amount >= Decimal::ZERO, "credit must be non-negative");
        self.balance += amount;
    }

    /// Debit spendable USD, failing without mutation if the balance is short.
    pub fn debit_usd(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if self.balance < amount {
            return Err(AccountError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Get the holding for a symbol, if one exists.
    pub fn holding(&self, symbol: &Symbol) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    /// Get the holding for a symbol, creating an empty one on first use.
    pub fn holding_mut(&mut self, symbol: &Symbol) -> &mut Holding {
        self.holdings
            .entry(symbol.clone())
            .or_insert_with(|| Holding::new(symbol.clone()))
    }

    pub fn touch(&mut self, timestamp: i64) {
        self.updated_at = timestamp;
    }
}
