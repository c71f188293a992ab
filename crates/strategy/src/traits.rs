//! Strategy trait and the signal it emits.
//!
//! Strategies are compiled Rust code. The single callback is
//! synchronous (no async, no locks, no I/O on the hot path) and the
//! engine is generic over the trait so the call monomorphises away.

use tick_core::types::{Price, Quantity, Side, SymbolId, TradeUpdate};

/// Decision produced by a strategy for one trade event.
///
/// Invariant: `should_trade` implies `side` is `Buy` or `Sell` and
/// `qty > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Signal {
    pub should_trade: bool,
    pub symbol_id: SymbolId,
    pub side: Side,
    pub price: Price,
    pub qty: Quantity,
    /// Reference (fair) price backing the decision; the risk gate
    /// measures price deviation against it.
    pub ref_price: Price,
}

impl Signal {
    /// A signal that declines to trade.
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }
}

/// A trading strategy consuming trade prints.
pub trait Strategy {
    /// Process one trade and decide whether to act. At most one signal
    /// per trade.
    fn on_trade(&mut self, trade: &TradeUpdate) -> Signal;
}
