//! Pre-trade risk gate.
//!
//! Every order command passes through [`RiskGate::check_new_order`]
//! before it may reach the gateway. The gate is stateful (rate bucket)
//! and owned by the engine thread; the only cross-thread input is the
//! kill switch, read with one acquire load.
//!
//! A rejection is silent here: the gate returns the reason and the
//! engine writes the audit record. Nothing on this path unwinds.

use tick_core::types::{OrderCommand, Price, Quantity};
use tick_core::CoreError;

use crate::kill_switch::KillSwitch;
use crate::rate_limit::TokenBucket;

/// Static limits for the pre-trade checks.
#[derive(Debug, Clone, Copy)]
pub struct RiskConfig {
    /// Maximum quantity of a single order.
    pub max_order_qty: Quantity,
    /// Maximum |order price − reference price|, compared on raw ticks.
    pub max_price_deviation: Price,
    /// Token-bucket capacity and refill rate, orders per second.
    pub max_orders_per_sec: i64,
}

/// Reason an order was rejected pre-trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RiskReject {
    /// Order quantity exceeds the configured maximum.
    #[error("order quantity exceeds limit")]
    QtyExceeded,
    /// Order price deviates from the reference by more than the band.
    #[error("order price outside deviation band")]
    PriceDeviation,
    /// The kill switch is armed; all new orders are rejected.
    #[error("kill switch armed")]
    KillSwitchArmed,
    /// Order submission rate exceeds the configured limit.
    #[error("order rate limit exceeded")]
    RateLimited,
}

/// Stateful pre-trade risk gate.
pub struct RiskGate {
    config: RiskConfig,
    kill_switch: KillSwitch,
    rate_bucket: TokenBucket,
}

impl RiskGate {
    /// Build a gate from validated limits.
    ///
    /// Non-positive limits are a [`CoreError::InvalidConfig`].
    pub fn new(config: RiskConfig, kill_switch: KillSwitch) -> Result<Self, CoreError> {
        if config.max_order_qty.units() <= 0 {
            return Err(CoreError::InvalidConfig(
                "risk max_order_qty must be positive".into(),
            ));
        }
        if config.max_price_deviation.ticks() <= 0 {
            return Err(CoreError::InvalidConfig(
                "risk max_price_deviation must be positive".into(),
            ));
        }
        if config.max_orders_per_sec <= 0 {
            return Err(CoreError::InvalidConfig(
                "risk max_orders_per_sec must be positive".into(),
            ));
        }

        let rate_bucket = TokenBucket::new(config.max_orders_per_sec);
        Ok(Self {
            config,
            kill_switch,
            rate_bucket,
        })
    }

    /// Evaluate a new order against all checks, in order: quantity cap,
    /// price deviation band, kill switch, rate limit. The first failing
    /// check short-circuits. A passing call consumes one rate token.
    #[inline]
    pub fn check_new_order(
        &mut self,
        cmd: &OrderCommand,
        ref_price: Price,
    ) -> Result<(), RiskReject> {
        if cmd.qty.units() > self.config.max_order_qty.units() {
            return Err(RiskReject::QtyExceeded);
        }

        let deviation = (cmd.price.ticks() - ref_price.ticks()).abs();
        if deviation > self.config.max_price_deviation.ticks() {
            return Err(RiskReject::PriceDeviation);
        }

        if self.kill_switch.is_armed() {
            return Err(RiskReject::KillSwitchArmed);
        }

        if !self.rate_bucket.try_consume() {
            return Err(RiskReject::RateLimited);
        }

        Ok(())
    }

    /// The gate's kill-switch handle (for sharing with control planes).
    pub fn kill_switch(&self) -> &KillSwitch {
        &self.kill_switch
    }
}
