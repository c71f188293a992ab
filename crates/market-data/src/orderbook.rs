//! L2 order book maintained from per-level updates.
//!
//! The book keeps one aggregated quantity per price on each side. Bids
//! are stored with [`std::cmp::Reverse`] keys so that iteration over
//! the underlying [`BTreeMap`] yields prices in descending order
//! (highest bid first); asks use natural ordering (lowest ask first).
//!
//! The book is owned by the engine thread and uses no locking. Updates
//! are O(log L) in the number of levels per side; snapshot reads are
//! O(n) in the requested depth.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use tick_core::types::{LevelUpdate, Price, Quantity, Side, SymbolId, Timestamp};

/// Default snapshot depth.
pub const MAX_DEPTH: usize = 10;

/// A single aggregated price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookLevel {
    pub price: Price,
    pub qty: Quantity,
}

/// Per-symbol L2 order book.
pub struct OrderBook {
    symbol_id: SymbolId,
    /// Bid levels: Reverse(price) -> quantity. Highest bid iterates first.
    bids: BTreeMap<Reverse<Price>, Quantity>,
    /// Ask levels: price -> quantity. Lowest ask iterates first.
    asks: BTreeMap<Price, Quantity>,
    last_update_ts: Timestamp,
}

impl OrderBook {
    /// Create a new, empty book for `symbol_id`.
    pub fn new(symbol_id: SymbolId) -> Self {
        Self {
            symbol_id,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            last_update_ts: Timestamp(0),
        }
    }

    /// Symbol this book represents.
    pub fn symbol_id(&self) -> SymbolId {
        self.symbol_id
    }

    /// Apply a level update.
    ///
    /// A zero quantity deletes the price level; any other quantity
    /// inserts or overwrites it. A level is created on its first
    /// non-zero update and destroyed by a zero-quantity update, so
    /// every resting entry has qty > 0.
    pub fn apply_update(&mut self, update: &LevelUpdate) {
        match update.side {
            Side::Buy => {
                if update.qty.is_zero() {
                    self.bids.remove(&Reverse(update.price));
                } else {
                    self.bids.insert(Reverse(update.price), update.qty);
                }
            }
            _ => {
                if update.qty.is_zero() {
                    self.asks.remove(&update.price);
                } else {
                    self.asks.insert(update.price, update.qty);
                }
            }
        }

        self.last_update_ts = update.header.local_ts;
    }

    /// Best bid and best ask, when both sides are non-empty.
    ///
    /// No crossing check is applied: exchanges may cross transiently
    /// and the book reports what it holds.
    pub fn bbo(&self) -> Option<(Price, Price)> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some((bid.price, ask.price))
    }

    /// Highest bid level, if any.
    pub fn best_bid(&self) -> Option<BookLevel> {
        self.bids
            .iter()
            .next()
            .map(|(Reverse(price), qty)| BookLevel {
                price: *price,
                qty: *qty,
            })
    }

    /// Lowest ask level, if any.
    pub fn best_ask(&self) -> Option<BookLevel> {
        self.asks.iter().next().map(|(price, qty)| BookLevel {
            price: *price,
            qty: *qty,
        })
    }

    /// Copy up to `n` levels per side into the provided buffers.
    ///
    /// Clears both outputs first. Bids are written in descending price
    /// order, asks ascending. Returns the number of ask levels filled.
    pub fn snapshot(
        &self,
        bids_out: &mut Vec<BookLevel>,
        asks_out: &mut Vec<BookLevel>,
        n: usize,
    ) -> usize {
        bids_out.clear();
        asks_out.clear();

        for (Reverse(price), qty) in self.bids.iter().take(n) {
            bids_out.push(BookLevel {
                price: *price,
                qty: *qty,
            });
        }

        for (price, qty) in self.asks.iter().take(n) {
            asks_out.push(BookLevel {
                price: *price,
                qty: *qty,
            });
        }

        asks_out.len()
    }

    /// Local timestamp of the most recently applied update.
    pub fn last_update_ts(&self) -> Timestamp {
        self.last_update_ts
    }

    /// Returns `(bid_level_count, ask_level_count)`.
    pub fn level_count(&self) -> (usize, usize) {
        (self.bids.len(), self.asks.len())
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap as Model;
    use tick_core::types::{MdHeader, UpdateKind};

    fn arb_update() -> impl Strategy<Value = LevelUpdate> {
        (
            prop_oneof![Just(Side::Buy), Just(Side::Sell)],
            1i64..50i64,
            0i64..5i64,
        )
            .prop_map(|(side, px, qty)| LevelUpdate {
                header: MdHeader {
                    exchange_ts: Timestamp(0),
                    local_ts: Timestamp(0),
                    symbol_id: 1,
                    kind: UpdateKind::Update,
                },
                price: Price::from_ticks(px * 100_000_000),
                qty: Quantity::from_units(qty * 100_000_000),
                side,
            })
    }

    proptest! {
        /// After any update sequence the book holds exactly the last
        /// non-zero quantity seen per (side, price), and nothing else.
        #[test]
        fn last_write_wins(updates in proptest::collection::vec(arb_update(), 0..100)) {
            let mut book = OrderBook::new(1);
            let mut bid_model: Model<i64, i64> = Model::new();
            let mut ask_model: Model<i64, i64> = Model::new();

            for u in &updates {
                book.apply_update(u);
                let model = if u.side == Side::Buy { &mut bid_model } else { &mut ask_model };
                if u.qty.is_zero() {
                    model.remove(&u.price.ticks());
                } else {
                    model.insert(u.price.ticks(), u.qty.units());
                }
            }

            let mut bids = Vec::new();
            let mut asks = Vec::new();
            book.snapshot(&mut bids, &mut asks, usize::MAX);

            let book_bids: Model<i64, i64> =
                bids.iter().map(|l| (l.price.ticks(), l.qty.units())).collect();
            let book_asks: Model<i64, i64> =
                asks.iter().map(|l| (l.price.ticks(), l.qty.units())).collect();

            prop_assert_eq!(book_bids, bid_model);
            prop_assert_eq!(book_asks, ask_model);
        }

        /// Every resting level has strictly positive quantity.
        #[test]
        fn no_zero_quantity_levels(updates in proptest::collection::vec(arb_update(), 0..100)) {
            let mut book = OrderBook::new(1);
            for u in &updates {
                book.apply_update(u);
            }

            let mut bids = Vec::new();
            let mut asks = Vec::new();
            book.snapshot(&mut bids, &mut asks, usize::MAX);
            for l in bids.iter().chain(asks.iter()) {
                prop_assert!(l.qty.units() > 0);
            }
        }
    }
}
