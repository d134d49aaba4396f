//! In-memory entity stores
//!
//! Each store maps an id to a record wrapped in `Arc<Mutex<_>>`. Operations
//! clone the handles they need out of the map and lock only those records, so
//! exclusive access is per-record and never map-wide. Handles are always
//! cloned out before any record is locked — a map shard guard is never held
//! across a record lock.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use types::account::Account;
use types::ids::{AccountId, OrderId, Symbol, TradeId};
use types::order::Order;
use types::trade::Trade;

/// Handle to a live account record.
pub type SharedAccount = Arc<Mutex<Account>>;
/// Handle to a live order record.
pub type SharedOrder = Arc<Mutex<Order>>;

/// Accounts keyed by id.
#[derive(Default)]
pub struct AccountStore {
    accounts: DashMap<AccountId, SharedAccount>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: Account) -> AccountId {
        let account_id = account.account_id;
        self.accounts
            .insert(account_id, Arc::new(Mutex::new(account)));
        account_id
    }

    pub fn get(&self, account_id: &AccountId) -> Option<SharedAccount> {
        self.accounts.get(account_id).map(|e| Arc::clone(e.value()))
    }
}

/// Durable set of orders, queried per match attempt.
#[derive(Default)]
pub struct OrderStore {
    orders: DashMap<OrderId, SharedOrder>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: Order) -> SharedOrder {
        let order_id = order.order_id;
        let handle = Arc::new(Mutex::new(order));
        self.orders.insert(order_id, Arc::clone(&handle));
        handle
    }

    pub fn get(&self, order_id: &OrderId) -> Option<SharedOrder> {
        self.orders.get(order_id).map(|e| Arc::clone(e.value()))
    }

    /// Snapshot of all order handles.
    pub(crate) fn handles(&self) -> Vec<SharedOrder> {
        self.orders.iter().map(|e| Arc::clone(e.value())).collect()
    }

    /// All open orders, optionally restricted to one symbol, highest price
    /// first (the shape the order book view consumes).
    pub fn open_orders(&self, symbol: Option<&Symbol>) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .handles()
            .into_iter()
            .map(|handle| handle.lock().clone())
            .filter(|order| order.is_open() && symbol.map_or(true, |s| order.symbol == *s))
            .collect();
        orders.sort_by(|a, b| {
            b.price
                .cmp(&a.price)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.order_id.cmp(&b.order_id))
        });
        orders
    }

    /// All of one account's orders, newest first.
    pub fn account_orders(&self, account_id: &AccountId) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .handles()
            .into_iter()
            .map(|handle| handle.lock().clone())
            .filter(|order| order.account_id == *account_id)
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.order_id.cmp(&a.order_id))
        });
        orders
    }
}

/// Settled trades keyed by id.
#[derive(Default)]
pub struct TradeStore {
    trades: DashMap<TradeId, Trade>,
}

impl TradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, trade: Trade) {
        self.trades.insert(trade.trade_id, trade);
    }

    pub fn get(&self, trade_id: &TradeId) -> Option<Trade> {
        self.trades.get(trade_id).map(|e| e.value().clone())
    }

    /// All trades in execution order.
    pub fn all(&self) -> Vec<Trade> {
        let mut trades: Vec<Trade> = self.trades.iter().map(|e| e.value().clone()).collect();
        trades.sort_by(|a, b| {
            a.executed_at
                .cmp(&b.executed_at)
                .then(a.trade_id.cmp(&b.trade_id))
        });
        trades
    }
}
