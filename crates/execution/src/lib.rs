//! # tick-execution
//!
//! The order-entry boundary and the execution engine that composes
//! strategy → risk → gateway on the market-data hot path.

pub mod engine;
pub mod gateway;

pub use engine::ExecutionEngine;
pub use gateway::{CommandKind, GatewayMessage, OrderGateway, SpscGateway};
