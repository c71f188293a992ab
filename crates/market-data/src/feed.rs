//! Feed boundary contracts.
//!
//! The core never depends on a concrete feed. A feeder drives a
//! [`TradeSink`] it holds by mutable reference; the execution engine
//! implements `TradeSink`, so the wiring is a plain generic call with
//! no dynamic dispatch on the delivery path.

use tick_core::types::TradeUpdate;

/// Anything that consumes normalized trade prints.
pub trait TradeSink {
    /// Deliver one trade. Called on the feeder's dispatch thread (or
    /// the engine thread when trades arrive through a ring).
    fn on_trade(&mut self, trade: &TradeUpdate);
}

/// Data-ingest boundary (exchange → system).
///
/// Implementations own their I/O thread. `stop` sets a flag checked by
/// the feed loop and joins the worker; there is no per-message
/// cancellation.
pub trait Feeder {
    /// Begin producing data.
    fn start(&mut self);

    /// Stop producing and join the worker.
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tick_core::types::{MdHeader, Price, Quantity, Side, UpdateKind};

    struct CountingSink {
        seen: usize,
    }

    impl TradeSink for CountingSink {
        fn on_trade(&mut self, _trade: &TradeUpdate) {
            self.seen += 1;
        }
    }

    #[test]
    fn test_sink_receives_trades() {
        let mut sink = CountingSink { seen: 0 };
        let trade = TradeUpdate {
            header: MdHeader {
                exchange_ts: tick_core::types::Timestamp(1),
                local_ts: tick_core::types::Timestamp(2),
                symbol_id: 1,
                kind: UpdateKind::Trade,
            },
            price: Price::from_float(100.0),
            qty: Quantity::from_float(1.0),
            side: Side::Buy,
        };

        sink.on_trade(&trade);
        sink.on_trade(&trade);
        assert_eq!(sink.seen, 2);
    }
}
