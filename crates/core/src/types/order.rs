//! Order-related types: symbol and order identifiers, side, and the
//! command record handed to the gateway.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::price::Price;
use super::quantity::Quantity;

/// Opaque symbol identifier assigned by the feed layer.
pub type SymbolId = u32;

/// Engine-assigned order identifier.
///
/// Strictly increasing within a process, starting at 1, never reused.
/// Ids are consumed for rejected orders too, so the audit trail is
/// monotonic but not gap-free.
pub type OrderId = u64;

/// Order side. `None` marks records that carry no side (e.g. a signal
/// that decided not to trade).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    #[default]
    None = 0,
    Buy = 1,
    Sell = 2,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::None => write!(f, "None"),
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// A new-order command bound for the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCommand {
    pub symbol_id: SymbolId,
    pub order_id: OrderId,
    pub price: Price,
    pub qty: Quantity,
    pub side: Side,
}
