//! Trade record types
//!
//! A trade is written once, at settlement, and never changes. It references
//! the two orders it filled and both owning accounts by id.

use crate::ids::{AccountId, OrderId, Symbol, TradeId};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable record of one settled match.
///
/// `volume_usd` is the gross value (price × quantity, quantized);
/// `fee_usd` was charged to the buyer on top of it and credited to no one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub symbol: Symbol,

    // Order references
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,

    // Account references
    pub buyer_account_id: AccountId,
    pub seller_account_id: AccountId,

    // Execution details (price is the sell order's limit price)
    pub price: Price,
    pub quantity: Quantity,
    pub volume_usd: Decimal,
    pub fee_usd: Decimal,

    pub executed_at: i64, // Unix nanos
}

impl Trade {
    /// Create a new trade record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: Symbol,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        buyer_account_id: AccountId,
        seller_account_id: AccountId,
        price: Price,
        quantity: Quantity,
        volume_usd: Decimal,
        fee_usd: Decimal,
        executed_at: i64,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            symbol,
            buy_order_id,
            sell_order_id,
            buyer_account_id,
            seller_account_id,
            price,
            quantity,
            volume_usd,
            fee_usd,
            executed_at,
        }
    }

    /// Total USD the buyer paid: gross volume plus the buyer-side fee.
    pub fn total_cost(&self) -> Decimal {
        self.volume_usd + self.fee_usd
    }
}
