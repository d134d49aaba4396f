//! Exchange engine facade
//!
//! Ties configuration, the entity stores and the notifier together, and
//! exposes the operations the outer API layer consumes: account funding,
//! order placement and cancellation, and the read-side queries. Matching is
//! demand-driven — each placement triggers exactly one match attempt.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use types::account::{Account, Holding};
use types::errors::{AccountError, ExchangeError, ValidationError};
use types::ids::{AccountId, OrderId, Symbol, TradeId};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::config::EngineConfig;
use crate::lifecycle;
use crate::matcher;
use crate::notifier::{LogNotifier, OrderView, TradeNotification, TradeNotifier};
use crate::store::{AccountStore, OrderStore, TradeStore};

/// A request to place a limit order, as produced by the outer API layer.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
}

/// Result of a placement: the order (possibly already filled) and the trade
/// the triggered match attempt produced, if any.
#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub order: Order,
    pub trade: Option<Trade>,
}

/// Balance-and-holdings view of one account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSnapshot {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub holdings: Vec<Holding>,
}

/// The exchange core engine.
pub struct Exchange {
    config: EngineConfig,
    accounts: AccountStore,
    orders: OrderStore,
    trades: TradeStore,
    notifier: Arc<dyn TradeNotifier>,
}

impl Exchange {
    /// Create an engine that logs settled trades.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_notifier(config, Arc::new(LogNotifier))
    }

    /// Create an engine with a custom trade notifier.
    pub fn with_notifier(config: EngineConfig, notifier: Arc<dyn TradeNotifier>) -> Self {
        Self {
            config,
            accounts: AccountStore::new(),
            orders: OrderStore::new(),
            trades: TradeStore::new(),
            notifier,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an account seeded with an opening USD balance.
    ///
    /// # Panics
    /// Panics if the opening balance is negative.
    pub fn create_account(&self, opening_balance: Decimal) -> AccountId {
        let account = Account::new(opening_balance, now_nanos());
        let account_id = self.accounts.insert(account);
        tracing::info!(%account_id, %opening_balance, "account created");
        account_id
    }

    /// Credit spendable USD to an account (external funding hook).
    pub fn deposit_usd(&self, account_id: AccountId, amount: Decimal) -> Result<(), ExchangeError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidQuantity(format!(
                "deposit must be positive, got {amount}"
            ))
            .into());
        }
        let account = self
            .accounts
            .get(&account_id)
            .ok_or(AccountError::NotFound { account_id })?;
        let mut guard = account.lock();
        guard.credit_usd(amount);
        guard.touch(now_nanos());
        Ok(())
    }

    /// Credit tradable asset quantity to an account (external funding hook).
    pub fn deposit_asset(
        &self,
        account_id: AccountId,
        symbol: &Symbol,
        quantity: Decimal,
    ) -> Result<(), ExchangeError> {
        if !self.config.supports(symbol) {
            return Err(ValidationError::UnsupportedSymbol {
                symbol: symbol.to_string(),
            }
            .into());
        }
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidQuantity(format!(
                "deposit must be positive, got {quantity}"
            ))
            .into());
        }
        let account = self
            .accounts
            .get(&account_id)
            .ok_or(AccountError::NotFound { account_id })?;
        let mut guard = account.lock();
        guard.holding_mut(symbol).credit(quantity);
        guard.touch(now_nanos());
        Ok(())
    }

    /// Place a limit order and attempt one match with it.
    ///
    /// On success the reservation has been applied, the order persisted, and
    /// — if a crossing counter-order of identical quantity was found — the
    /// trade settled and the notifier informed. A placement whose match
    /// attempt produced no trade is still a success: the order rests open.
    pub fn place_order(&self, request: PlaceOrderRequest) -> Result<Placement, ExchangeError> {
        let now = now_nanos();
        let handle = lifecycle::place(&self.config, &self.accounts, &self.orders, &request, now)?;

        let trade = matcher::attempt(
            &self.config.fees,
            &self.accounts,
            &self.orders,
            &self.trades,
            &handle,
            now,
        )?;

        if let Some(trade) = &trade {
            // Outside the settlement's exclusive holds: a slow or failing
            // notifier cannot roll back the committed trade.
            self.notifier.notify_trade(&TradeNotification {
                buy_order: OrderView {
                    order_id: trade.buy_order_id,
                    status: types::order::OrderStatus::Filled,
                },
                sell_order: OrderView {
                    order_id: trade.sell_order_id,
                    status: types::order::OrderStatus::Filled,
                },
                trade: trade.clone(),
            });
        }

        let order = handle.lock().clone();
        Ok(Placement { order, trade })
    }

    /// Cancel an open order, reversing its reservation.
    pub fn cancel_order(
        &self,
        owner_id: AccountId,
        order_id: OrderId,
    ) -> Result<Order, ExchangeError> {
        lifecycle::cancel(&self.accounts, &self.orders, owner_id, order_id, now_nanos())
    }

    /// All open orders, optionally restricted to one symbol, highest price
    /// first.
    pub fn open_orders(&self, symbol: Option<&Symbol>) -> Vec<Order> {
        self.orders.open_orders(symbol)
    }

    /// All of an account's orders, newest first.
    pub fn account_orders(&self, account_id: AccountId) -> Result<Vec<Order>, ExchangeError> {
        if self.accounts.get(&account_id).is_none() {
            return Err(AccountError::NotFound { account_id }.into());
        }
        Ok(self.orders.account_orders(&account_id))
    }

    /// Balance and holdings of one account.
    pub fn account_snapshot(&self, account_id: AccountId) -> Result<AccountSnapshot, ExchangeError> {
        let account = self
            .accounts
            .get(&account_id)
            .ok_or(AccountError::NotFound { account_id })?;
        let guard = account.lock();
        let mut holdings: Vec<Holding> = guard.holdings.values().cloned().collect();
        holdings.sort_by(|a, b| a.symbol.as_str().cmp(b.symbol.as_str()));
        Ok(AccountSnapshot {
            account_id: guard.account_id,
            balance: guard.balance,
            holdings,
        })
    }

    /// Look up one settled trade.
    pub fn trade(&self, trade_id: &TradeId) -> Option<Trade> {
        self.trades.get(trade_id)
    }

    /// All settled trades in execution order.
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.all()
    }
}

/// Current wall-clock time in Unix nanoseconds.
fn now_nanos() -> i64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or(i64::MAX)
}
