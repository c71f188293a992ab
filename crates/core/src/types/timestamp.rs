//! Nanosecond-precision timestamps.
//!
//! [`Timestamp`] wraps an `i64` nanosecond count from a monotonic epoch.
//! [`Timestamp::now`] uses `clock_gettime(CLOCK_MONOTONIC)` where
//! available so the hot path pays one vDSO call and never observes NTP
//! steps. The epoch is unspecified: timestamps are only meaningful
//! relative to each other within one process.
//!
//! The audit logger needs calendar time for its line format; that comes
//! from [`wall_clock_nanos`], which is explicitly *not* monotonic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nanoseconds since an unspecified monotonic epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Capture the current monotonic time.
    #[inline]
    pub fn now() -> Self {
        Self(now_nanos())
    }

    /// Raw nanosecond value.
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Nanoseconds elapsed from `earlier` to `self`.
    ///
    /// Negative when `self` precedes `earlier`; callers on the latency
    /// path clamp, the histogram tolerates negatives.
    #[inline]
    pub const fn elapsed_since(self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0 / 1_000_000_000;
        let nanos = (self.0 % 1_000_000_000).abs();
        write!(f, "{}.{:09}", secs, nanos)
    }
}

/// Current monotonic time in nanoseconds.
#[inline]
pub fn now_nanos() -> i64 {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        clock_monotonic_nanos()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        use std::time::Instant;
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let start = START.get_or_init(Instant::now);
        start.elapsed().as_nanos() as i64
    }
}

/// Current wall-clock time as nanoseconds since the Unix epoch.
///
/// For human-readable log lines only; subject to clock steps.
#[inline]
pub fn wall_clock_nanos() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(dur) => dur.as_nanos() as i64,
        Err(_) => 0,
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn clock_monotonic_nanos() -> i64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: passing a valid pointer to a stack-allocated timespec.
    unsafe {
        libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
    }
    ts.tv_sec as i64 * 1_000_000_000 + ts.tv_nsec as i64
}
