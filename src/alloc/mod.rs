//! Slot allocators.
//!
//! One allocator lives here today: a word-packed bitmap over caller-owned
//! storage, for handing out fixed-capacity pool indices (buffer slots,
//! per-thread IDs) without a lock.

pub mod bitmap;

pub use bitmap::{BitmapAllocator, InitError};
