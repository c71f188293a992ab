//! Mean-reversion strategy over an EWMA fair price.
//!
//! The strategy tracks one symbol. Each trade print updates an EWMA of
//! the traded price; when the current price deviates from that fair
//! value by more than the configured threshold, the strategy leans
//! against the move with a small fixed clip at the traded price.

use tick_core::types::{Price, Quantity, Side, SymbolId, TradeUpdate};
use tick_core::CoreError;

use crate::signals::Ewma;
use crate::traits::{Signal, Strategy};

/// EWMA smoothing factor for the fair price.
const PRICE_EWMA_ALPHA: f64 = 0.1;

/// Clip size attached to every signal.
const CLIP_QTY: f64 = 0.01;

/// Mean-reversion strategy for a single symbol.
pub struct MeanReversion {
    target_id: SymbolId,
    threshold: f64,
    price_ewma: Ewma,
}

impl MeanReversion {
    /// Create a strategy trading `target_id` with the given entry
    /// threshold (in price units) and the default EWMA alpha.
    ///
    /// A non-positive threshold is a [`CoreError::InvalidConfig`].
    pub fn new(target_id: SymbolId, threshold: f64) -> Result<Self, CoreError> {
        Self::with_alpha(target_id, threshold, PRICE_EWMA_ALPHA)
    }

    /// Create a strategy with an explicit EWMA smoothing factor.
    ///
    /// `alpha` must lie in `(0, 1]`.
    pub fn with_alpha(target_id: SymbolId, threshold: f64, alpha: f64) -> Result<Self, CoreError> {
        if !(threshold > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "mean-reversion threshold must be positive, got {threshold}"
            )));
        }
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "mean-reversion ewma alpha must lie in (0, 1], got {alpha}"
            )));
        }
        Ok(Self {
            target_id,
            threshold,
            price_ewma: Ewma::new(alpha),
        })
    }

    /// Current fair-price estimate.
    pub fn fair_price(&self) -> f64 {
        self.price_ewma.value()
    }
}

impl Strategy for MeanReversion {
    fn on_trade(&mut self, trade: &TradeUpdate) -> Signal {
        // Only care about our symbol.
        if trade.header.symbol_id != self.target_id {
            return Signal::none();
        }

        let px = trade.price.to_float();
        self.price_ewma.update(px);

        let fairness = self.price_ewma.value();
        let deviation = px - fairness;

        // The first trade sets the EWMA to the traded price, so
        // deviation is zero and nothing can fire.
        if deviation > self.threshold {
            // Price too high: sell it back toward fair.
            Signal {
                should_trade: true,
                symbol_id: self.target_id,
                side: Side::Sell,
                price: trade.price,
                qty: Quantity::from_float(CLIP_QTY),
                ref_price: Price::from_float(fairness),
            }
        } else if deviation < -self.threshold {
            Signal {
                should_trade: true,
                symbol_id: self.target_id,
                side: Side::Buy,
                price: trade.price,
                qty: Quantity::from_float(CLIP_QTY),
                ref_price: Price::from_float(fairness),
            }
        } else {
            Signal::none()
        }
    }
}
