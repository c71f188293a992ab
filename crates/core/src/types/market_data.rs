//! Normalized market-data records.
//!
//! These are the canonical internal representation a feed adapter
//! produces. Every record is `Copy` and fixed-size so it can cross an
//! SPSC ring without touching the allocator.

use serde::{Deserialize, Serialize};

use super::order::{Side, SymbolId};
use super::price::Price;
use super::quantity::Quantity;
use super::timestamp::Timestamp;

/// Kind of market-data record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum UpdateKind {
    /// Trade print.
    #[default]
    Trade = 0,
    /// Best bid/offer (L1) update.
    Bbo = 1,
    /// Depth (L2) level update.
    Update = 2,
    /// Full book snapshot marker.
    Snapshot = 3,
}

/// Header common to all market-data records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdHeader {
    /// Timestamp stamped by the exchange.
    pub exchange_ts: Timestamp,
    /// Local receipt timestamp.
    pub local_ts: Timestamp,
    pub symbol_id: SymbolId,
    pub kind: UpdateKind,
}

/// A trade print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeUpdate {
    pub header: MdHeader,
    pub price: Price,
    pub qty: Quantity,
    /// Aggressor (taker) side.
    pub side: Side,
}

/// An L2 price-level update. `qty == 0` deletes the level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpdate {
    pub header: MdHeader,
    pub price: Price,
    pub qty: Quantity,
    pub side: Side,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_update_is_copy_and_fixed_size() {
        let trade = TradeUpdate {
            header: MdHeader {
                exchange_ts: Timestamp(1),
                local_ts: Timestamp(2),
                symbol_id: 7,
                kind: UpdateKind::Trade,
            },
            price: Price::from_float(100.0),
            qty: Quantity::from_float(0.5),
            side: Side::Buy,
        };
        let copy = trade;
        assert_eq!(copy, trade);
    }

    #[test]
    fn test_level_update_delete_is_qty_zero() {
        let update = LevelUpdate {
            header: MdHeader::default(),
            price: Price::from_float(99.0),
            qty: Quantity::ZERO,
            side: Side::Sell,
        };
        assert!(update.qty.is_zero());
    }

    #[test]
    fn test_update_kind_discriminants() {
        assert_eq!(UpdateKind::Trade as u8, 0);
        assert_eq!(UpdateKind::Bbo as u8, 1);
        assert_eq!(UpdateKind::Update as u8, 2);
        assert_eq!(UpdateKind::Snapshot as u8, 3);
    }
}
