//! Lock-free latency histogram and sample reservoir.
//!
//! [`LatencyHistogram`] counts samples into seven fixed buckets with
//! relaxed atomic adds and CAS-loop min/max; [`LatencyTracker`] adds a
//! capped circular sample store so exact percentiles can be computed
//! off the hot path. Any thread may record; queries and JSON export are
//! read-side operations intended for diagnostics and the benchmark
//! harness.

use std::path::Path;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use serde::Serialize;

use crate::error::CoreError;

/// Number of histogram buckets.
pub const NUM_BUCKETS: usize = 7;

/// Exclusive upper bounds of each bucket, in nanoseconds.
pub const BUCKET_BOUNDS: [i64; NUM_BUCKETS] = [
    100,       // < 100ns
    500,       // < 500ns
    1_000,     // < 1us
    10_000,    // < 10us
    100_000,   // < 100us
    1_000_000, // < 1ms
    i64::MAX,  // >= 1ms
];

/// Human-readable bucket labels, also used as JSON keys.
pub const BUCKET_NAMES: [&str; NUM_BUCKETS] =
    ["<100ns", "<500ns", "<1us", "<10us", "<100us", "<1ms", ">=1ms"];

/// Default reservoir capacity.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 100_000;

/// Lock-free counting histogram over [`BUCKET_BOUNDS`].
pub struct LatencyHistogram {
    buckets: [AtomicI64; NUM_BUCKETS],
    count: AtomicI64,
    sum: AtomicI64,
    min: AtomicI64,
    max: AtomicI64,
}

impl LatencyHistogram {
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| AtomicI64::new(0)),
            count: AtomicI64::new(0),
            sum: AtomicI64::new(0),
            min: AtomicI64::new(i64::MAX),
            max: AtomicI64::new(0),
        }
    }

    /// Record a latency sample.
    ///
    /// Negative samples land in the first bucket: `now_nanos` deltas
    /// can go backwards on platforms without a strict monotonic clock.
    #[inline]
    pub fn record(&self, latency_ns: i64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(latency_ns, Ordering::Relaxed);

        // Relaxed CAS loops: nothing else depends on min/max ordering.
        let mut current_min = self.min.load(Ordering::Relaxed);
        while latency_ns < current_min {
            match self.min.compare_exchange_weak(
                current_min,
                latency_ns,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current_min = observed,
            }
        }

        let mut current_max = self.max.load(Ordering::Relaxed);
        while latency_ns > current_max {
            match self.max.compare_exchange_weak(
                current_max,
                latency_ns,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current_max = observed,
            }
        }

        for (i, &bound) in BUCKET_BOUNDS.iter().enumerate() {
            if latency_ns < bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                break;
            }
        }
    }

    /// Total number of recorded samples.
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Sum of all recorded samples.
    pub fn sum(&self) -> i64 {
        self.sum.load(Ordering::Relaxed)
    }

    /// Minimum recorded sample, or 0 if none.
    pub fn min_latency(&self) -> i64 {
        let m = self.min.load(Ordering::Relaxed);
        if m == i64::MAX {
            0
        } else {
            m
        }
    }

    /// Maximum recorded sample.
    pub fn max_latency(&self) -> i64 {
        self.max.load(Ordering::Relaxed)
    }

    /// Arithmetic mean, or 0.0 if no samples.
    pub fn mean(&self) -> f64 {
        let c = self.count();
        if c > 0 {
            self.sum() as f64 / c as f64
        } else {
            0.0
        }
    }

    /// Count in bucket `idx`, or 0 for an out-of-range index.
    pub fn bucket_count(&self, idx: usize) -> i64 {
        if idx < NUM_BUCKETS {
            self.buckets[idx].load(Ordering::Relaxed)
        } else {
            0
        }
    }

    /// Zero all counters.
    pub fn reset(&self) {
        for b in &self.buckets {
            b.store(0, Ordering::Relaxed);
        }
        self.count.store(0, Ordering::Relaxed);
        self.sum.store(0, Ordering::Relaxed);
        self.min.store(i64::MAX, Ordering::Relaxed);
        self.max.store(0, Ordering::Relaxed);
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Histogram plus a circular reservoir of raw samples for exact
/// percentile queries.
pub struct LatencyTracker {
    histogram: LatencyHistogram,
    samples: Box<[AtomicI64]>,
    write_idx: AtomicUsize,
}

impl LatencyTracker {
    /// Tracker with the default reservoir capacity (100 000 samples).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_CAPACITY)
    }

    /// Tracker with an explicit reservoir capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "sample capacity must be positive");
        let samples = (0..capacity)
            .map(|_| AtomicI64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            histogram: LatencyHistogram::new(),
            samples,
            write_idx: AtomicUsize::new(0),
        }
    }

    /// Record a latency sample into the histogram and the reservoir.
    ///
    /// The reservoir wraps: once full, the oldest sample at each slot
    /// is overwritten.
    #[inline]
    pub fn record(&self, latency_ns: i64) {
        self.histogram.record(latency_ns);
        let idx = self.write_idx.fetch_add(1, Ordering::Relaxed) % self.samples.len();
        self.samples[idx].store(latency_ns, Ordering::Relaxed);
    }

    /// The underlying histogram.
    pub fn histogram(&self) -> &LatencyHistogram {
        &self.histogram
    }

    /// Exact percentile over the retained samples. Not for the hot
    /// path: copies and sorts up to the reservoir capacity.
    ///
    /// Linear interpolation at index `p/100 * (n-1)`; returns 0.0 when
    /// no samples have been recorded.
    pub fn percentile(&self, p: f64) -> f64 {
        let n = (self.histogram.count() as usize).min(self.samples.len());
        if n == 0 {
            return 0.0;
        }

        let mut sorted: Vec<i64> = self.samples[..n]
            .iter()
            .map(|s| s.load(Ordering::Relaxed))
            .collect();
        sorted.sort_unstable();

        let idx = (p / 100.0) * (n - 1) as f64;
        let lower = idx as usize;
        let upper = (lower + 1).min(n - 1);
        let frac = idx - lower as f64;

        sorted[lower] as f64 * (1.0 - frac) + sorted[upper] as f64 * frac
    }

    pub fn p50(&self) -> f64 {
        self.percentile(50.0)
    }

    pub fn p95(&self) -> f64 {
        self.percentile(95.0)
    }

    pub fn p99(&self) -> f64 {
        self.percentile(99.0)
    }

    pub fn p999(&self) -> f64 {
        self.percentile(99.9)
    }

    /// Build the exportable summary (see [`LatencySummary`]).
    pub fn summary(&self) -> LatencySummary {
        let n = (self.histogram.count() as usize).min(self.samples.len());
        // Raw samples in index order from 0: after wrap-around this is
        // no longer chronological, which the export format preserves.
        let samples: Vec<i64> = self.samples[..n.min(1000)]
            .iter()
            .map(|s| s.load(Ordering::Relaxed))
            .collect();

        LatencySummary {
            count: self.histogram.count(),
            min_ns: self.histogram.min_latency(),
            max_ns: self.histogram.max_latency(),
            mean_ns: self.histogram.mean(),
            p50_ns: self.p50(),
            p95_ns: self.p95(),
            p99_ns: self.p99(),
            p999_ns: self.p999(),
            histogram: BucketCounts {
                lt_100ns: self.histogram.bucket_count(0),
                lt_500ns: self.histogram.bucket_count(1),
                lt_1us: self.histogram.bucket_count(2),
                lt_10us: self.histogram.bucket_count(3),
                lt_100us: self.histogram.bucket_count(4),
                lt_1ms: self.histogram.bucket_count(5),
                ge_1ms: self.histogram.bucket_count(6),
            },
            samples,
        }
    }

    /// Write the summary as JSON to `path`.
    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &self.summary())
            .map_err(|e| CoreError::Io(e.into()))?;
        Ok(())
    }

    /// Zero the histogram and rewind the reservoir.
    pub fn reset(&self) {
        self.histogram.reset();
        self.write_idx.store(0, Ordering::Relaxed);
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON export schema. Field order is load-bearing: the file is diffed
/// across runs.
#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary {
    pub count: i64,
    pub min_ns: i64,
    pub max_ns: i64,
    pub mean_ns: f64,
    pub p50_ns: f64,
    pub p95_ns: f64,
    pub p99_ns: f64,
    pub p999_ns: f64,
    pub histogram: BucketCounts,
    /// Up to 1000 raw samples in reservoir index order.
    pub samples: Vec<i64>,
}

/// Per-bucket counts keyed by the bucket labels.
#[derive(Debug, Clone, Serialize)]
pub struct BucketCounts {
    #[serde(rename = "<100ns")]
    pub lt_100ns: i64,
    #[serde(rename = "<500ns")]
    pub lt_500ns: i64,
    #[serde(rename = "<1us")]
    pub lt_1us: i64,
    #[serde(rename = "<10us")]
    pub lt_10us: i64,
    #[serde(rename = "<100us")]
    pub lt_100us: i64,
    #[serde(rename = "<1ms")]
    pub lt_1ms: i64,
    #[serde(rename = ">=1ms")]
    pub ge_1ms: i64,
}

/// RAII guard recording the elapsed time of its scope into a tracker.
pub struct LatencyGuard<'a> {
    tracker: &'a LatencyTracker,
    start: i64,
}

impl<'a> LatencyGuard<'a> {
    #[inline]
    pub fn new(tracker: &'a LatencyTracker) -> Self {
        Self {
            tracker,
            start: crate::types::now_nanos(),
        }
    }
}

impl Drop for LatencyGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.tracker.record(crate::types::now_nanos() - self.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let hist = LatencyHistogram::new();
        hist.record(99); // < 100ns
        hist.record(100); // < 500ns (bounds are exclusive)
        hist.record(-5); // negative clamps into the first bucket
        hist.record(1_000_000_000_000_000_000); // >= 1ms

        assert_eq!(hist.bucket_count(0), 2);
        assert_eq!(hist.bucket_count(1), 1);
        assert_eq!(hist.bucket_count(6), 1);
        assert_eq!(hist.count(), 4);
    }

    #[test]
    fn test_min_max_mean() {
        let hist = LatencyHistogram::new();
        hist.record(100);
        hist.record(200);
        hist.record(300);

        assert_eq!(hist.min_latency(), 100);
        assert_eq!(hist.max_latency(), 300);
        assert!((hist.mean() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_histogram() {
        let hist = LatencyHistogram::new();
        assert_eq!(hist.count(), 0);
        assert_eq!(hist.min_latency(), 0);
        assert_eq!(hist.max_latency(), 0);
        assert_eq!(hist.mean(), 0.0);
    }

    #[test]
    fn test_negative_min_recorded() {
        let hist = LatencyHistogram::new();
        hist.record(-7);
        hist.record(50);
        assert_eq!(hist.min_latency(), -7);
    }

    #[test]
    fn test_reset() {
        let hist = LatencyHistogram::new();
        hist.record(123);
        hist.reset();
        assert_eq!(hist.count(), 0);
        assert_eq!(hist.bucket_count(1), 0);
        assert_eq!(hist.min_latency(), 0);
    }

    #[test]
    fn test_out_of_range_bucket_is_zero() {
        let hist = LatencyHistogram::new();
        assert_eq!(hist.bucket_count(NUM_BUCKETS), 0);
    }

    #[test]
    fn test_percentile_empty_is_zero() {
        let tracker = LatencyTracker::with_capacity(16);
        assert_eq!(tracker.percentile(50.0), 0.0);
    }

    #[test]
    fn test_percentile_single_sample() {
        let tracker = LatencyTracker::with_capacity(16);
        tracker.record(42);
        assert_eq!(tracker.percentile(0.0), 42.0);
        assert_eq!(tracker.percentile(50.0), 42.0);
        assert_eq!(tracker.percentile(100.0), 42.0);
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let tracker = LatencyTracker::with_capacity(16);
        // Sorted: [10, 20, 30, 40]; p50 index = 0.5 * 3 = 1.5 -> 25.
        for v in [40, 10, 30, 20] {
            tracker.record(v);
        }
        assert!((tracker.percentile(50.0) - 25.0).abs() < 1e-9);
        assert_eq!(tracker.percentile(0.0), 10.0);
        assert_eq!(tracker.percentile(100.0), 40.0);
    }

    #[test]
    fn test_percentile_matches_formula() {
        let tracker = LatencyTracker::with_capacity(128);
        for v in 1..=100i64 {
            tracker.record(v);
        }
        // p95 over 1..=100: idx = 0.95 * 99 = 94.05 -> 95 + 0.05 * 1
        assert!((tracker.p95() - 95.05).abs() < 1e-9);
        assert!((tracker.p50() - 50.5).abs() < 1e-9);
    }

    #[test]
    fn test_reservoir_wraps() {
        let tracker = LatencyTracker::with_capacity(4);
        for v in 0..10i64 {
            tracker.record(v);
        }
        // Count keeps growing but only 4 samples are retained.
        assert_eq!(tracker.histogram().count(), 10);
        let summary = tracker.summary();
        assert_eq!(summary.samples.len(), 4);
    }

    #[test]
    fn test_summary_fields() {
        let tracker = LatencyTracker::with_capacity(16);
        tracker.record(99);
        tracker.record(600);

        let summary = tracker.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.min_ns, 99);
        assert_eq!(summary.max_ns, 600);
        assert_eq!(summary.histogram.lt_100ns, 1);
        assert_eq!(summary.histogram.lt_1us, 1);
        assert_eq!(summary.samples, vec![99, 600]);
    }

    #[test]
    fn test_summary_caps_samples_at_1000() {
        let tracker = LatencyTracker::with_capacity(2048);
        for v in 0..1500i64 {
            tracker.record(v);
        }
        assert_eq!(tracker.summary().samples.len(), 1000);
    }

    #[test]
    fn test_json_field_order_preserved() {
        let tracker = LatencyTracker::with_capacity(8);
        tracker.record(50);

        let json = serde_json::to_string(&tracker.summary()).unwrap();
        let count_pos = json.find("\"count\"").unwrap();
        let min_pos = json.find("\"min_ns\"").unwrap();
        let mean_pos = json.find("\"mean_ns\"").unwrap();
        let hist_pos = json.find("\"histogram\"").unwrap();
        let samples_pos = json.find("\"samples\"").unwrap();
        assert!(count_pos < min_pos && min_pos < mean_pos);
        assert!(mean_pos < hist_pos && hist_pos < samples_pos);
        assert!(json.contains("\"<100ns\""));
        assert!(json.contains("\">=1ms\""));
    }

    #[test]
    fn test_export_json_writes_file() {
        let tracker = LatencyTracker::with_capacity(8);
        tracker.record(123);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency.json");
        tracker.export_json(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["samples"][0], 123);
    }

    #[test]
    fn test_concurrent_recording() {
        use std::sync::Arc;

        let tracker = Arc::new(LatencyTracker::with_capacity(1024));
        let mut handles = Vec::new();
        for t in 0..4 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                for i in 0..1000i64 {
                    tracker.record(t * 1000 + i);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(tracker.histogram().count(), 4000);
    }

    #[test]
    fn test_latency_guard_records_one_sample() {
        let tracker = LatencyTracker::with_capacity(8);
        {
            let _guard = LatencyGuard::new(&tracker);
            std::hint::black_box(42);
        }
        assert_eq!(tracker.histogram().count(), 1);
    }
}
