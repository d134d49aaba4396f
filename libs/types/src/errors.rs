//! Error taxonomy for the exchange core
//!
//! Request-shaped failures (bad input, insufficient funds, illegal cancel)
//! surface to the caller unchanged; `ExchangeError::Inconsistency` is reserved
//! for internal invariant breaks that must never be silently swallowed.

use crate::ids::{AccountId, OrderId, Symbol};
use crate::order::OrderStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Malformed input, rejected before any state change.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unsupported symbol: {symbol}")]
    UnsupportedSymbol { symbol: String },

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Account and balance errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccountError {
    #[error("account not found: {account_id}")]
    NotFound { account_id: AccountId },

    #[error("insufficient USD balance: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("insufficient {symbol} balance: requested {requested}, available {available}")]
    InsufficientAsset {
        symbol: Symbol,
        requested: Decimal,
        available: Decimal,
    },

    #[error("holding invariant violated for {symbol}")]
    InvariantViolation { symbol: Symbol },
}

/// Order lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("order not found: {order_id}")]
    NotFound { order_id: OrderId },

    #[error("order belongs to another account")]
    Forbidden,

    #[error("order is not open: {status}")]
    InvalidState { status: OrderStatus },
}

/// Top-level error surfaced by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("account error: {0}")]
    Account(#[from] AccountError),

    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// A settlement-time invariant failed (e.g. a buy order's reservation no
    /// longer covers the execution cost). Indicates a bug, not a user error.
    #[error("internal inconsistency: {detail}")]
    Inconsistency { detail: String },
}
