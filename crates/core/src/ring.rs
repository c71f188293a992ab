//! Bounded lock-free single-producer/single-consumer ring.
//!
//! One writer thread owns the head cursor, one reader thread owns the
//! tail cursor; both are cache-line padded so the cursors never share a
//! line. Capacity must be a power of two (index masking instead of
//! modulo) and one slot is kept in reserve, so a ring of capacity `C`
//! buffers at most `C - 1` unread items.
//!
//! [`channel`] returns split [`Producer`] / [`Consumer`] handles. The
//! split makes the SPSC contract structural: there is no way to obtain
//! a second writer or reader short of wrapping a handle in a lock, at
//! which point it is no longer this ring's problem.
//!
//! Ordering protocol: the producer writes the slot, then releases
//! `head`; the consumer acquires `head` before reading the slot, then
//! releases `tail`. The producer acquires `tail` for its full check so
//! a freed slot is safe to overwrite.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;

use crate::error::CoreError;

struct Shared<T> {
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    mask: usize,
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// SAFETY: slot access is coordinated by the head/tail protocol above;
// a slot is written only while it is invisible to the consumer and read
// only after the producer's release of `head` is acquired.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send> Sync for Shared<T> {}

/// Create an SPSC ring of the given capacity.
///
/// `capacity` must be a power of two and at least 2; anything else is
/// a [`CoreError::InvalidConfig`]. The usable depth is `capacity - 1`.
pub fn channel<T: Copy>(capacity: usize) -> Result<(Producer<T>, Consumer<T>), CoreError> {
    if capacity < 2 || !capacity.is_power_of_two() {
        return Err(CoreError::InvalidConfig(format!(
            "ring capacity must be a power of two >= 2, got {capacity}"
        )));
    }

    let slots = (0..capacity)
        .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
        .collect::<Vec<_>>()
        .into_boxed_slice();

    let shared = Arc::new(Shared {
        head: CachePadded::new(AtomicUsize::new(0)),
        tail: CachePadded::new(AtomicUsize::new(0)),
        mask: capacity - 1,
        slots,
    });

    Ok((
        Producer {
            shared: Arc::clone(&shared),
        },
        Consumer { shared },
    ))
}

/// Writing half of an SPSC ring. Owned by exactly one thread.
pub struct Producer<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Copy> Producer<T> {
    /// Enqueue an item. Returns `false` if the ring is full. Wait-free.
    #[inline]
    pub fn push(&mut self, item: T) -> bool {
        let shared = &*self.shared;
        let head = shared.head.load(Ordering::Relaxed);
        let next = (head + 1) & shared.mask;

        if next == shared.tail.load(Ordering::Acquire) {
            return false; // full
        }

        // SAFETY: `head` is owned by this producer and the slot at
        // `head` is not visible to the consumer until the release below.
        unsafe {
            (*shared.slots[head].get()).write(item);
        }
        shared.head.store(next, Ordering::Release);
        true
    }

    /// Total slot count (usable depth is one less).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }
}

/// Reading half of an SPSC ring. Owned by exactly one thread.
pub struct Consumer<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Copy> Consumer<T> {
    /// Dequeue an item. Returns `None` if the ring is empty. Wait-free.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let shared = &*self.shared;
        let tail = shared.tail.load(Ordering::Relaxed);

        if tail == shared.head.load(Ordering::Acquire) {
            return None; // empty
        }

        // SAFETY: the acquire above synchronizes with the producer's
        // release of `head`, so the slot at `tail` is initialized.
        let item = unsafe { (*shared.slots[tail].get()).assume_init_read() };
        shared.tail.store((tail + 1) & shared.mask, Ordering::Release);
        Some(item)
    }

    /// Zero-copy peek at the next item, if any.
    ///
    /// The borrow pins the consumer: [`advance`](Self::advance) cannot
    /// be called while the reference is live, so the slot cannot be
    /// reclaimed under the reader.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        let shared = &*self.shared;
        let tail = shared.tail.load(Ordering::Relaxed);

        if tail == shared.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: same synchronization argument as `pop`.
        unsafe { Some((*shared.slots[tail].get()).assume_init_ref()) }
    }

    /// Release the slot last returned by [`front`](Self::front).
    ///
    /// Must only be called after `front` returned `Some`.
    #[inline]
    pub fn advance(&mut self) {
        let shared = &*self.shared;
        let tail = shared.tail.load(Ordering::Relaxed);
        debug_assert_ne!(
            tail,
            shared.head.load(Ordering::Acquire),
            "advance() on an empty ring"
        );
        shared.tail.store((tail + 1) & shared.mask, Ordering::Release);
    }

    /// Returns `true` if no item is currently readable.
    #[inline]
    pub fn is_empty(&self) -> bool {
        let shared = &*self.shared;
        shared.tail.load(Ordering::Relaxed) == shared.head.load(Ordering::Acquire)
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    proptest! {
        /// Any interleaving of pushes and pops matches a VecDeque model
        /// with capacity C-1.
        #[test]
        fn matches_queue_model(ops in proptest::collection::vec(any::<Option<u16>>(), 0..200)) {
            let cap = 8usize;
            let (mut tx, mut rx) = channel::<u16>(cap).unwrap();
            let mut model: VecDeque<u16> = VecDeque::new();

            for op in ops {
                match op {
                    Some(v) => {
                        let pushed = tx.push(v);
                        if model.len() < cap - 1 {
                            prop_assert!(pushed);
                            model.push_back(v);
                        } else {
                            prop_assert!(!pushed);
                        }
                    }
                    None => {
                        prop_assert_eq!(rx.pop(), model.pop_front());
                    }
                }
            }

            // Drain and compare the remainder in order.
            while let Some(expected) = model.pop_front() {
                prop_assert_eq!(rx.pop(), Some(expected));
            }
            prop_assert_eq!(rx.pop(), None);
        }
    }
}
