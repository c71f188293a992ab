//! Asynchronous audit logger.
//!
//! The hot path formats a fixed 128-byte record on the caller's stack
//! and pushes it into a 4096-slot SPSC ring; a background worker drains
//! the ring and writes `[YYYY-MM-DD HH:MM:SS.<ns>] [LEVEL] msg` lines.
//! On a full queue the record is dropped silently; the hot path never
//! blocks for logging.
//!
//! The logger is an owned value handed to its single producer (the
//! engine thread) by dependency injection; there is no process global.
//! A deployment with several producer threads instantiates one logger
//! per producer.

use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{self, AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use chrono::TimeZone;

use crate::error::CoreError;
use crate::ring::{self, Consumer, Producer};
use crate::types::wall_clock_nanos;

/// Audit record severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// Maximum message payload per record. Longer messages are truncated.
pub const MAX_MESSAGE_LEN: usize = 128;

/// Ring depth between producer and the writer thread.
const QUEUE_CAPACITY: usize = 4096;

/// Fixed-size log record; `Copy` so it traverses the ring by value.
#[derive(Clone, Copy)]
pub struct LogEntry {
    ts: i64,
    level: Level,
    len: u8,
    message: [u8; MAX_MESSAGE_LEN],
}

impl LogEntry {
    fn new(level: Level, args: fmt::Arguments<'_>) -> Self {
        let mut buf = MessageBuf::new();
        // Infallible: MessageBuf drops bytes past the cap.
        let _ = buf.write_fmt(args);
        Self {
            ts: wall_clock_nanos(),
            level,
            len: buf.len as u8,
            message: buf.bytes,
        }
    }

    fn message(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.message[..self.len as usize])
    }
}

/// Stack buffer that accepts at most [`MAX_MESSAGE_LEN`] bytes and
/// silently discards the rest.
struct MessageBuf {
    bytes: [u8; MAX_MESSAGE_LEN],
    len: usize,
}

impl MessageBuf {
    fn new() -> Self {
        Self {
            bytes: [0; MAX_MESSAGE_LEN],
            len: 0,
        }
    }
}

impl fmt::Write for MessageBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = MAX_MESSAGE_LEN - self.len;
        let take = remaining.min(s.len());
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

/// Background-writer audit logger. See the module docs for the
/// threading contract.
pub struct Logger {
    tx: Producer<LogEntry>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Logger {
    /// Open `path` in append mode and spawn the writer thread.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let (tx, rx) = ring::channel::<LogEntry>(QUEUE_CAPACITY)?;
        let running = Arc::new(AtomicBool::new(true));

        let worker_running = Arc::clone(&running);
        let worker = std::thread::Builder::new()
            .name("tick-logger".into())
            .spawn(move || drain_loop(rx, file, worker_running))
            .map_err(CoreError::Io)?;

        Ok(Self {
            tx,
            running,
            worker: Some(worker),
        })
    }

    /// Queue a plain message. Dropped silently if the queue is full or
    /// the logger has been stopped.
    #[inline]
    pub fn log(&mut self, level: Level, msg: &str) {
        self.log_fmt(level, format_args!("{msg}"));
    }

    /// Queue a formatted message without heap allocation: the record is
    /// rendered into its fixed buffer on this thread's stack.
    #[inline]
    pub fn log_fmt(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if !self.running.load(Ordering::Relaxed) {
            return; // stopped: discard
        }
        let entry = LogEntry::new(level, args);
        let _ = self.tx.push(entry); // full: drop, never block
    }

    /// Flag the worker to finish, wait for the final drain, and join.
    pub fn stop(&mut self) {
        if self.running.swap(false, Ordering::Release) {
            if let Some(worker) = self.worker.take() {
                let _ = worker.join();
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

fn drain_loop(mut rx: Consumer<LogEntry>, file: std::fs::File, running: Arc<AtomicBool>) {
    let mut out = BufWriter::new(file);

    loop {
        let mut wrote = false;
        while let Some(entry) = rx.pop() {
            if let Err(e) = write_entry(&mut out, &entry) {
                tracing::error!(error = %e, "audit log writer failed, exiting");
                return;
            }
            wrote = true;
        }

        if !running.load(Ordering::Acquire) {
            // The producer's last publishes must be visible to this
            // final drain.
            atomic::fence(Ordering::Acquire);
            while let Some(entry) = rx.pop() {
                if let Err(e) = write_entry(&mut out, &entry) {
                    tracing::error!(error = %e, "audit log writer failed during shutdown");
                    return;
                }
            }
            let _ = out.flush();
            return;
        }

        if wrote {
            let _ = out.flush();
        }
        std::thread::yield_now();
    }
}

fn write_entry(out: &mut impl Write, entry: &LogEntry) -> std::io::Result<()> {
    let secs = entry.ts / 1_000_000_000;
    let nanos = entry.ts % 1_000_000_000;

    let date = chrono::Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "1970-01-01 00:00:00".to_string());

    // The nanosecond remainder is intentionally not zero-padded.
    writeln!(out, "[{date}.{nanos}] [{}] {}", entry.level, entry.message())
}
