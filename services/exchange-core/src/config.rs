//! Engine configuration

use rust_decimal::Decimal;
use types::fee::FeeSchedule;
use types::ids::Symbol;

/// Engine configuration: tradable symbols, fee schedule, minimum increments.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fee schedule shared by reservation and settlement
    pub fees: FeeSchedule,
    /// Symbols accepted by order placement
    pub supported_symbols: Vec<Symbol>,
    /// Smallest accepted limit price
    pub min_price: Decimal,
    /// Smallest accepted order quantity
    pub min_quantity: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::default(),
            supported_symbols: vec![Symbol::new("BTC"), Symbol::new("ETH")],
            min_price: Decimal::new(1, 8),
            min_quantity: Decimal::new(1, 8),
        }
    }
}

impl EngineConfig {
    /// Whether a symbol is tradable under this configuration.
    pub fn supports(&self, symbol: &Symbol) -> bool {
        self.supported_symbols.contains(symbol)
    }
}
