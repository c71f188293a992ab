//! TICK demo trading binary.
//!
//! Wires the full hot path with a mock feed: a feeder thread pushes
//! random-walk trades into the market-data ring, the engine thread
//! drains it through strategy → risk → gateway, and the gateway's
//! outbound ring is drained by an egress thread that stands in for a
//! network sender. Audit records flow through the asynchronous logger.

mod feeder;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use feeder::MockFeeder;
use tick_core::config::AppConfig;
use tick_core::logger::Logger;
use tick_core::ring;
use tick_core::types::{Price, Quantity, TradeUpdate};
use tick_execution::{ExecutionEngine, GatewayMessage, SpscGateway};
use tick_market_data::feed::Feeder;
use tick_risk::{KillSwitch, RiskConfig};
use tick_strategy::MeanReversion;

/// Ring depth for market data and outbound orders.
const RING_CAPACITY: usize = 4096;

/// TICK trading engine (mock feed)
#[derive(Parser, Debug)]
#[command(name = "tick-trading", about = "TICK trading engine demo")]
struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run for this many seconds instead of waiting for Enter.
    #[arg(long)]
    duration_secs: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config)?;

    tick_core::logging::init_tracing();

    tracing::info!(
        symbol_id = config.engine.symbol_id,
        threshold = config.engine.threshold,
        audit_path = %config.audit.path,
        "starting tick-trading"
    );

    // ── Components ───────────────────────────────────────────────
    let audit = Logger::init(&config.audit.path)?;
    let kill_switch = KillSwitch::new();

    let strategy = MeanReversion::with_alpha(
        config.engine.symbol_id,
        config.engine.threshold,
        config.engine.ewma_alpha,
    )?;

    let risk_config = RiskConfig {
        max_order_qty: Quantity::from_float(config.risk.max_order_qty),
        max_price_deviation: Price::from_float(config.risk.max_price_deviation),
        max_orders_per_sec: config.risk.max_orders_per_sec,
    };

    // ── Rings ────────────────────────────────────────────────────
    let (md_tx, mut md_rx) = ring::channel::<TradeUpdate>(RING_CAPACITY)?;
    let (out_tx, mut out_rx) = ring::channel::<GatewayMessage>(RING_CAPACITY)?;

    let gateway = SpscGateway::new(out_tx);
    let mut engine = ExecutionEngine::new(strategy, gateway, risk_config, kill_switch, audit)?;

    // ── Egress thread: drains the outbound ring ──────────────────
    let egress_running = Arc::new(AtomicBool::new(true));
    let egress_flag = Arc::clone(&egress_running);
    let egress = std::thread::Builder::new()
        .name("tick-egress".into())
        .spawn(move || {
            let mut sent = 0u64;
            loop {
                while let Some(msg) = out_rx.pop() {
                    sent += 1;
                    tracing::debug!(
                        order_id = msg.command.order_id,
                        symbol_id = msg.command.symbol_id,
                        kind = ?msg.kind,
                        "egress: order handed to wire"
                    );
                }
                if !egress_flag.load(Ordering::Acquire) && out_rx.is_empty() {
                    break;
                }
                std::thread::yield_now();
            }
            tracing::info!(sent, "egress thread stopped");
        })?;

    // ── Engine thread: drains the market-data ring ───────────────
    let engine_running = Arc::new(AtomicBool::new(true));
    let engine_flag = Arc::clone(&engine_running);
    let engine_thread = std::thread::Builder::new()
        .name("tick-engine".into())
        .spawn(move || {
            loop {
                while let Some(trade) = md_rx.pop() {
                    engine.on_trade(&trade);
                }
                if !engine_flag.load(Ordering::Acquire) && md_rx.is_empty() {
                    break;
                }
                std::thread::yield_now();
            }

            let hist = engine.latency().histogram();
            tracing::info!(
                trades = hist.count(),
                p50_ns = engine.latency().p50(),
                p99_ns = engine.latency().p99(),
                max_ns = hist.max_latency(),
                "engine thread stopped"
            );
            engine.shutdown();
        })?;

    // ── Feed ─────────────────────────────────────────────────────
    let mut feeder = MockFeeder::new(
        config.engine.symbol_id,
        config.feeder.start_price,
        Duration::from_micros(config.feeder.tick_interval_us),
        md_tx,
    );
    feeder.start();
    tracing::info!("engine running");

    match args.duration_secs {
        Some(secs) => std::thread::sleep(Duration::from_secs(secs)),
        None => {
            println!("Press Enter to stop...");
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
        }
    }

    // ── Shutdown, producers first ────────────────────────────────
    tracing::info!("stopping");
    feeder.stop();
    engine_running.store(false, Ordering::Release);
    engine_thread.join().expect("engine thread panicked");
    egress_running.store(false, Ordering::Release);
    egress.join().expect("egress thread panicked");

    tracing::info!("stopped");
    Ok(())
}
