//! Mock market-data feeder.
//!
//! Generates a random-walk trade stream on its own thread and pushes
//! each print into the market-data ring, standing in for an exchange
//! connection so the full feeder → ring → engine path can run without
//! a network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use rand::Rng;

use tick_core::ring::Producer;
use tick_core::types::{
    MdHeader, Price, Quantity, Side, SymbolId, Timestamp, TradeUpdate, UpdateKind,
};
use tick_market_data::feed::Feeder;

/// Random-walk trade generator feeding an SPSC ring.
pub struct MockFeeder {
    symbol_id: SymbolId,
    start_price: f64,
    interval: Duration,
    running: Arc<AtomicBool>,
    tx: Option<Producer<TradeUpdate>>,
    worker: Option<JoinHandle<()>>,
}

impl MockFeeder {
    pub fn new(
        symbol_id: SymbolId,
        start_price: f64,
        interval: Duration,
        tx: Producer<TradeUpdate>,
    ) -> Self {
        Self {
            symbol_id,
            start_price,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            tx: Some(tx),
            worker: None,
        }
    }
}

impl Feeder for MockFeeder {
    fn start(&mut self) {
        let Some(mut tx) = self.tx.take() else {
            return; // already started
        };

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        let symbol_id = self.symbol_id;
        let interval = self.interval;
        let mut price = self.start_price;

        self.worker = Some(
            std::thread::Builder::new()
                .name("tick-feeder".into())
                .spawn(move || {
                    let mut rng = rand::thread_rng();
                    while running.load(Ordering::Acquire) {
                        price += (rng.gen_range(0..100) as f64 - 50.0) * 0.01;

                        let trade = TradeUpdate {
                            header: MdHeader {
                                exchange_ts: Timestamp::now(),
                                local_ts: Timestamp::now(),
                                symbol_id,
                                kind: UpdateKind::Trade,
                            },
                            price: Price::from_float(price),
                            qty: Quantity::from_float(0.1),
                            side: if rng.gen_bool(0.5) {
                                Side::Buy
                            } else {
                                Side::Sell
                            },
                        };

                        // Ring full: the print is dropped, the feed
                        // does not stall.
                        let _ = tx.push(trade);

                        std::thread::sleep(interval);
                    }
                })
                .expect("spawn feeder thread"),
        );
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for MockFeeder {
    fn drop(&mut self) {
        self.stop();
    }
}
