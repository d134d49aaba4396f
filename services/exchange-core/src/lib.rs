//! Exchange core service
//!
//! The order-matching and settlement engine: reserves funds or assets when a
//! limit order is placed, finds a crossing counter-order of identical
//! quantity, settles the exchange of value between the two accounts in one
//! atomic unit, and records the resulting trade. Matching is demand-driven
//! and first-come-first-served; concurrent placements, cancellations and
//! match attempts are coordinated through per-record exclusive holds, not a
//! global lock.
//!
//! **Key invariants:**
//! - Conservation: settlement moves exactly the traded volume and quantity;
//!   only the buyer-side fee leaves the system
//! - Exactly-once settlement: an order fills at most once, racing attempts
//!   observe the loss and produce no trade
//! - No double-spend: reservations are debited before an order becomes
//!   visible and are exactly reversed on cancellation

pub mod config;
pub mod engine;
pub mod notifier;
pub mod store;

mod lifecycle;
mod matcher;

pub use config::EngineConfig;
pub use engine::{AccountSnapshot, Exchange, PlaceOrderRequest, Placement};
pub use notifier::{ChannelNotifier, LogNotifier, NullNotifier, TradeNotification, TradeNotifier};
