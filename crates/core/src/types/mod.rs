//! Core types for the TICK trading engine.
//!
//! Everything here is designed for the hot path: fixed-point arithmetic
//! instead of floats, raw-nanosecond timestamps, and `Copy` market-data
//! records that fit in an SPSC ring slot.

pub mod market_data;
pub mod order;
pub mod price;
pub mod quantity;
pub mod timestamp;

// Re-export primary types for convenient access via `tick_core::types::*`.
pub use market_data::{LevelUpdate, MdHeader, TradeUpdate, UpdateKind};
pub use order::{OrderCommand, OrderId, Side, SymbolId};
pub use price::{Price, PRICE_SCALE};
pub use quantity::{Quantity, QTY_SCALE};
pub use timestamp::{now_nanos, wall_clock_nanos, Timestamp};
