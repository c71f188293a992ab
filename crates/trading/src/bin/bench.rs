//! Latency benchmark harness.
//!
//! Drives the mean-reversion strategy with a synthetic random-walk
//! trade stream and measures the observed-trade → signal latency with
//! the lock-free tracker, then prints a console report and exports the
//! JSON summary.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

use tick_core::latency::{LatencyTracker, BUCKET_NAMES, NUM_BUCKETS};
use tick_core::types::{
    now_nanos, MdHeader, Price, Quantity, Side, SymbolId, Timestamp, TradeUpdate, UpdateKind,
};
use tick_strategy::{MeanReversion, Strategy};

/// TICK engine latency benchmark
#[derive(Parser, Debug)]
#[command(name = "tick-bench", about = "TICK engine latency benchmark")]
struct Args {
    /// Number of measured iterations.
    #[arg(long, default_value_t = 100_000)]
    iterations: u64,

    /// Warmup iterations before measurement.
    #[arg(long, default_value_t = 1_000)]
    warmup: u64,

    /// Output JSON file.
    #[arg(long, default_value = "latency.json")]
    output: String,
}

/// Run `iterations` trades through the strategy, recording per-event
/// latency into `tracker`.
fn simulate_hot_path(
    tracker: &LatencyTracker,
    strategy: &mut MeanReversion,
    price: &mut f64,
    iterations: u64,
) {
    const SYMBOL: SymbolId = 1;
    let mut rng = rand::thread_rng();

    for _ in 0..iterations {
        let start = now_nanos();

        *price += (rng.gen_range(0..100) as f64 - 50.0) * 0.01;
        let trade = TradeUpdate {
            header: MdHeader {
                exchange_ts: Timestamp::now(),
                local_ts: Timestamp::now(),
                symbol_id: SYMBOL,
                kind: UpdateKind::Trade,
            },
            price: Price::from_float(*price),
            qty: Quantity::from_float(0.1),
            side: if rng.gen_bool(0.5) {
                Side::Buy
            } else {
                Side::Sell
            },
        };

        let signal = strategy.on_trade(&trade);
        std::hint::black_box(signal);

        tracker.record(now_nanos() - start);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("=== TICK Engine Latency Benchmark ===");
    println!("Warmup iterations: {}", args.warmup);
    println!("Benchmark iterations: {}\n", args.iterations);

    let mut strategy = MeanReversion::new(1, 1.5).context("build strategy")?;
    let mut price = 50_000.0;

    print!("Running warmup...");
    let warmup_tracker = LatencyTracker::new();
    simulate_hot_path(&warmup_tracker, &mut strategy, &mut price, args.warmup);
    println!(" done.");

    print!("Running benchmark...");
    let tracker = LatencyTracker::new();
    let bench_start = Instant::now();
    simulate_hot_path(&tracker, &mut strategy, &mut price, args.iterations);
    let wall_time = bench_start.elapsed();
    println!(" done.\n");

    let wall_time_ms = wall_time.as_millis().max(1);
    let hist = tracker.histogram();

    println!("=== Results ===");
    println!("Total samples:   {}", hist.count());
    println!("Wall clock time: {} ms", wall_time_ms);
    println!(
        "Throughput:      {:.0} ops/sec\n",
        args.iterations as f64 * 1000.0 / wall_time_ms as f64
    );

    println!("Latency Statistics:");
    println!("  Min:    {} ns", hist.min_latency());
    println!("  Max:    {} ns", hist.max_latency());
    println!("  Mean:   {:.1} ns", hist.mean());
    println!("  P50:    {:.1} ns", tracker.p50());
    println!("  P95:    {:.1} ns", tracker.p95());
    println!("  P99:    {:.1} ns", tracker.p99());
    println!("  P99.9:  {:.1} ns\n", tracker.p999());

    println!("Histogram:");
    for i in 0..NUM_BUCKETS {
        let count = hist.bucket_count(i);
        let pct = 100.0 * count as f64 / hist.count().max(1) as f64;
        println!("  {}: {} ({:.2}%)", BUCKET_NAMES[i], count, pct);
    }

    tracker
        .export_json(&args.output)
        .with_context(|| format!("export latency JSON to {}", args.output))?;
    println!("\nResults exported to: {}", args.output);

    Ok(())
}
