//! Execution engine: strategy → risk → gateway.
//!
//! [`ExecutionEngine`] is generic over its strategy and gateway so the
//! whole trade → signal → check → send path monomorphises with no
//! virtual dispatch. It is not thread-safe by design: it is owned by
//! the single engine thread that drains the market-data ring, and it
//! owns one side of the audit logger's SPSC queue.
//!
//! Latency is sampled at entry and egress of [`on_trade`]
//! (`ExecutionEngine::on_trade`) so production telemetry matches what
//! the benchmark harness measures around the strategy call.

use tick_core::latency::LatencyTracker;
use tick_core::logger::{Level, Logger};
use tick_core::types::{now_nanos, OrderCommand, OrderId, TradeUpdate};
use tick_core::CoreError;
use tick_market_data::feed::TradeSink;
use tick_risk::{KillSwitch, RiskConfig, RiskGate};
use tick_strategy::traits::{Signal, Strategy};

use crate::gateway::OrderGateway;

/// Composes a strategy, the risk gate, and a gateway.
pub struct ExecutionEngine<S: Strategy, G: OrderGateway> {
    strategy: S,
    gateway: G,
    risk: RiskGate,
    audit: Logger,
    latency: LatencyTracker,
    next_order_id: OrderId,
}

impl<S: Strategy, G: OrderGateway> ExecutionEngine<S, G> {
    /// Build an engine. Fails on invalid risk limits.
    pub fn new(
        strategy: S,
        gateway: G,
        risk_config: RiskConfig,
        kill_switch: KillSwitch,
        audit: Logger,
    ) -> Result<Self, CoreError> {
        let risk = RiskGate::new(risk_config, kill_switch)?;
        Ok(Self {
            strategy,
            gateway,
            risk,
            audit,
            latency: LatencyTracker::new(),
            next_order_id: 1,
        })
    }

    /// Main hot-path callback: process one trade print.
    pub fn on_trade(&mut self, trade: &TradeUpdate) {
        let entry_ns = now_nanos();

        let signal = self.strategy.on_trade(trade);
        if signal.should_trade {
            self.execute_signal(&signal);
        }

        self.latency.record(now_nanos() - entry_ns);
    }

    #[inline]
    fn execute_signal(&mut self, signal: &Signal) {
        let cmd = OrderCommand {
            symbol_id: signal.symbol_id,
            order_id: self.next_order_id,
            price: signal.price,
            qty: signal.qty,
            side: signal.side,
        };
        // The id is consumed even when risk rejects: ids are monotonic,
        // not gap-free in the audit trail.
        self.next_order_id += 1;

        match self.risk.check_new_order(&cmd, signal.ref_price) {
            Ok(()) => {
                self.gateway.send_order(&cmd);
                self.audit.log_fmt(
                    Level::Info,
                    format_args!(
                        "ORDER_SENT id={} sym={} px={} qty={}",
                        cmd.order_id,
                        cmd.symbol_id,
                        cmd.price.to_float(),
                        cmd.qty.to_float()
                    ),
                );
            }
            Err(reason) => {
                self.audit.log_fmt(
                    Level::Warn,
                    format_args!(
                        "RISK_REJECT id={} sym={} reason={}",
                        cmd.order_id, cmd.symbol_id, reason
                    ),
                );
            }
        }
    }

    /// Next id the engine will assign.
    pub fn next_order_id(&self) -> OrderId {
        self.next_order_id
    }

    /// Per-trade latency telemetry.
    pub fn latency(&self) -> &LatencyTracker {
        &self.latency
    }

    /// The gateway, for tests and diagnostics.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Flush and stop the audit worker. Also happens on drop.
    pub fn shutdown(&mut self) {
        self.audit.stop();
    }
}

impl<S: Strategy, G: OrderGateway> TradeSink for ExecutionEngine<S, G> {
    #[inline]
    fn on_trade(&mut self, trade: &TradeUpdate) {
        ExecutionEngine::on_trade(self, trade);
    }
}
