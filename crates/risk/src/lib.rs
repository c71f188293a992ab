//! # tick-risk
//!
//! Pre-trade risk management: quantity cap, fat-finger price band,
//! order rate limiting, and the process-wide kill switch. Every order
//! passes through [`RiskGate`] before it may reach the gateway.

pub mod gate;
pub mod kill_switch;
pub mod rate_limit;

pub use gate::{RiskConfig, RiskGate, RiskReject};
pub use kill_switch::KillSwitch;
pub use rate_limit::TokenBucket;
