//! # tick-market-data
//!
//! L2 order book maintenance and the feed boundary contracts for the
//! TICK trading engine.

pub mod feed;
pub mod orderbook;

pub use feed::{Feeder, TradeSink};
pub use orderbook::{BookLevel, OrderBook, MAX_DEPTH};
