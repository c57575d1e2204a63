//! Atomic primitives with optional loom support.
//!
//! This module is the only place the crate names an atomics implementation.
//! Production builds use the native `core::sync::atomic` types; enabling the
//! `loom` feature swaps in `loom`'s model-checked equivalents so the deque and
//! allocator protocols can be exhaustively interleaved under `loom::model`.

#[cfg(not(feature = "loom"))]
pub use core::sync::atomic::{fence, AtomicU32, AtomicUsize, Ordering};

#[cfg(feature = "loom")]
pub use loom::sync::atomic::{fence, AtomicU32, AtomicUsize, Ordering};

/// Spin loop hint - yields to other threads in loom.
#[cfg(not(feature = "loom"))]
#[inline]
pub fn spin_loop() {
    core::hint::spin_loop();
}

/// Spin loop hint - yields to other threads in loom.
#[cfg(feature = "loom")]
#[inline]
pub fn spin_loop() {
    loom::thread::yield_now();
}
