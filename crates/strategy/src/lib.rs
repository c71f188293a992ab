//! # tick-strategy
//!
//! Signal components and trading strategies. Strategies implement the
//! synchronous [`Strategy`] trait; the engine is generic over it so the
//! hot-path call has no dynamic dispatch.

pub mod mean_reversion;
pub mod signals;
pub mod traits;

pub use mean_reversion::MeanReversion;
pub use signals::Ewma;
pub use traits::{Signal, Strategy};
