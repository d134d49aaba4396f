//! Unique identifier types for exchange entities
//!
//! Entity IDs use UUID v7, which embeds the creation instant, so identifier
//! ordering is stable and time-sortable — the matcher relies on this to break
//! timestamp ties deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traded asset symbol (e.g. "BTC", "ETH").
///
/// Uppercase ASCII alphanumerics, at most ten characters. Whether a symbol is
/// actually tradable is decided by the engine configuration, not the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// # Panics
    /// Panics if the symbol is empty, longer than ten characters, or contains
    /// anything other than uppercase ASCII alphanumerics.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::try_new(symbol).expect("invalid asset symbol")
    }

    /// Try to create a Symbol, returning None if invalid.
    pub fn try_new(symbol: impl Into<String>) -> Option<Self> {
        let s = symbol.into();
        let valid = !s.is_empty()
            && s.len() <= 10
            && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        valid.then_some(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(AccountId::new(), AccountId::new());
        assert_ne!(OrderId::new(), OrderId::new());
        assert_ne!(TradeId::new(), TradeId::new());
    }

    #[test]
    fn test_order_ids_are_time_sortable() {
        let first = OrderId::new();
        let second = OrderId::new();
        assert!(first < second, "later v7 UUIDs must sort after earlier ones");
    }

    #[test]
    fn test_id_serialization() {
        let id = OrderId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_symbol_valid() {
        let symbol = Symbol::new("BTC");
        assert_eq!(symbol.as_str(), "BTC");
    }

    #[test]
    fn test_symbol_rejects_lowercase_and_empty() {
        assert!(Symbol::try_new("btc").is_none());
        assert!(Symbol::try_new("").is_none());
        assert!(Symbol::try_new("TOOLONGSYMBOL").is_none());
    }

    #[test]
    fn test_symbol_serialization() {
        let symbol = Symbol::new("ETH");
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"ETH\"");
    }
}
