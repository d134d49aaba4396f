//! Trade notification
//!
//! Settlement returns a committed trade; delivery to the two involved
//! accounts happens here, strictly outside the settlement's atomic unit, so a
//! notification failure can never roll back a trade. Delivery is best-effort
//! and unacknowledged.

use serde::Serialize;
use tokio::sync::broadcast;
use types::ids::{AccountId, OrderId};
use types::order::OrderStatus;
use types::trade::Trade;

/// Id-and-status view of one order involved in a trade.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Payload delivered once per settled trade.
#[derive(Debug, Clone, Serialize)]
pub struct TradeNotification {
    pub trade: Trade,
    pub buy_order: OrderView,
    pub sell_order: OrderView,
}

impl TradeNotification {
    /// The two accounts that should each receive their own view.
    pub fn recipients(&self) -> [AccountId; 2] {
        [
            self.trade.buyer_account_id,
            self.trade.seller_account_id,
        ]
    }
}

/// Downstream consumer of settled trades.
pub trait TradeNotifier: Send + Sync {
    /// Deliver a settled trade. Must not block settlement and must not fail
    /// loudly; implementations log and move on.
    fn notify_trade(&self, notification: &TradeNotification);
}

/// Drops every notification; the default for tests.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl TradeNotifier for NullNotifier {
    fn notify_trade(&self, _notification: &TradeNotification) {}
}

/// Logs each settled trade through `tracing`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl TradeNotifier for LogNotifier {
    fn notify_trade(&self, notification: &TradeNotification) {
        tracing::info!(
            trade_id = %notification.trade.trade_id,
            buyer = %notification.trade.buyer_account_id,
            seller = %notification.trade.seller_account_id,
            buy_order = %notification.buy_order.order_id,
            sell_order = %notification.sell_order.order_id,
            "trade notification"
        );
    }
}

/// Fans notifications out over a tokio broadcast channel; a realtime delivery
/// layer subscribes and pushes each party its own view.
pub struct ChannelNotifier {
    sender: broadcast::Sender<TradeNotification>,
}

impl ChannelNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TradeNotification> {
        self.sender.subscribe()
    }
}

impl TradeNotifier for ChannelNotifier {
    fn notify_trade(&self, notification: &TradeNotification) {
        // send fails only when nobody is subscribed; that is fine.
        if self.sender.send(notification.clone()).is_err() {
            tracing::debug!(
                trade_id = %notification.trade.trade_id,
                "no notification subscribers"
            );
        }
    }
}
