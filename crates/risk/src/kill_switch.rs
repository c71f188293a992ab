//! Process-wide emergency trading halt.
//!
//! [`KillSwitch`] is a cloneable handle over one shared atomic flag,
//! no language-level global. Any thread may arm or disarm it; the risk
//! gate reads it with a single acquire load on every order, which is
//! the entire hot-path cost.
//!
//! The trigger reason is logged, not stored: the switch itself stays a
//! single bit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared kill-switch handle. Clones observe the same flag.
#[derive(Clone)]
pub struct KillSwitch {
    armed: Arc<AtomicBool>,
}

impl KillSwitch {
    /// Create a disarmed kill switch.
    pub fn new() -> Self {
        Self {
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns `true` if the switch is armed. Safe on the hot path.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Arm the switch, halting all new orders.
    pub fn trigger(&self, reason: &str) {
        self.armed.store(true, Ordering::Release);
        tracing::error!(reason, "KILL SWITCH ARMED: rejecting all new orders");
    }

    /// Disarm the switch, re-enabling trading.
    pub fn reset(&self) {
        self.armed.store(false, Ordering::Release);
        tracing::warn!("kill switch reset, trading re-enabled");
    }
}

impl Default for KillSwitch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_disarmed() {
        let ks = KillSwitch::new();
        assert!(!ks.is_armed());
    }

    #[test]
    fn test_trigger_arms() {
        let ks = KillSwitch::new();
        ks.trigger("manual halt");
        assert!(ks.is_armed());
    }

    #[test]
    fn test_reset_disarms() {
        let ks = KillSwitch::new();
        ks.trigger("test");
        ks.reset();
        assert!(!ks.is_armed());
    }

    #[test]
    fn test_clones_share_state() {
        let ks = KillSwitch::new();
        let observer = ks.clone();
        ks.trigger("shared flag");
        assert!(observer.is_armed());
        observer.reset();
        assert!(!ks.is_armed());
    }

    #[test]
    fn test_cross_thread_visibility() {
        let ks = KillSwitch::new();
        let remote = ks.clone();

        let handle = std::thread::spawn(move || {
            remote.trigger("armed from another thread");
        });
        handle.join().unwrap();

        assert!(ks.is_armed());
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let ks = KillSwitch::new();
        ks.trigger("first");
        ks.trigger("second");
        assert!(ks.is_armed());
    }
}
