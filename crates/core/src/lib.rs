//! # tick-core
//!
//! Shared types and hot-path primitives for the TICK trading engine:
//! fixed-point price/quantity types, nanosecond timestamps, normalized
//! market-data records, the SPSC ring used for inter-thread hand-off,
//! the lock-free latency tracker, and the asynchronous audit logger.
//!
//! Everything on the hot path is allocation-free and non-blocking;
//! anything that can fail does so at construction time via
//! [`error::CoreError`].

pub mod config;
pub mod error;
pub mod latency;
pub mod logger;
pub mod logging;
pub mod ring;
pub mod types;

pub use error::CoreError;
