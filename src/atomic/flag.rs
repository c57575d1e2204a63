//! A test-and-set flag.
//!
//! `SpinFlag` is the floor of the crate's primitive stack: a single word that
//! is either clear or set, toggled with an atomic exchange. Everything richer
//! (the deque, the bitmap allocator) is built from compare-and-swap instead;
//! the flag exists for callers that need last-resort mutual exclusion, and it
//! is an owned value that must be passed explicitly - there is no hidden
//! global lock anywhere in this crate.

use crate::sync::{AtomicU32, Ordering};

#[cfg(not(feature = "loom"))]
use crossbeam_utils::Backoff;

const CLEAR: u32 = 0;
const SET: u32 = 1;

/// A spinlock-style test-and-set flag.
///
/// The flag starts clear. [`test_and_set`](SpinFlag::test_and_set) atomically
/// sets it and reports whether this call was the one that set it; callers that
/// need a critical section should prefer [`lock`](SpinFlag::lock), which spins
/// with backoff and releases on exit.
pub struct SpinFlag {
    bit: AtomicU32,
}

impl SpinFlag {
    /// Creates a new, clear flag.
    #[cfg(not(feature = "loom"))]
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            bit: AtomicU32::new(CLEAR),
        }
    }

    /// Creates a new, clear flag.
    #[cfg(feature = "loom")]
    pub fn new() -> Self {
        Self {
            bit: AtomicU32::new(CLEAR),
        }
    }

    /// Sets the flag and returns `true` iff this call observed it clear.
    #[inline(always)]
    pub fn test_and_set(&self, order: Ordering) -> bool {
        self.bit.swap(SET, order) == CLEAR
    }

    /// Clears the flag.
    #[inline(always)]
    pub fn clear(&self, order: Ordering) {
        self.bit.store(CLEAR, order);
    }

    /// Returns whether the flag is currently set.
    #[inline(always)]
    pub fn is_set(&self, order: Ordering) -> bool {
        self.bit.load(order) != CLEAR
    }

    /// Runs `f` while holding the flag, spinning until it is acquired.
    ///
    /// Acquisition uses an acquire exchange and release happens on a release
    /// store, so writes made inside `f` are visible to the next holder.
    pub fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        #[cfg(not(feature = "loom"))]
        {
            let backoff = Backoff::new();
            while !self.test_and_set(Ordering::Acquire) {
                backoff.snooze();
            }
        }
        #[cfg(feature = "loom")]
        {
            while !self.test_and_set(Ordering::Acquire) {
                crate::sync::spin_loop();
            }
        }

        let result = f();
        self.clear(Ordering::Release);
        result
    }
}

impl Default for SpinFlag {
    fn default() -> Self {
        Self::new()
    }
}
