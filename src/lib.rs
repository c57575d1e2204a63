//! # `weft` - Lock-Free Work Distribution Primitives
//!
//! A small toolkit of lock-free building blocks for spreading work across
//! threads: a single-owner/multi-thief work-stealing deque and a concurrent
//! bitmap slot allocator, sitting on a thin atomic-primitive adapter.
//!
//! ## Safety Guarantees
//!
//! ### Memory Safety
//! - **No unsafe code**: every shared location is an atomic word, so racing
//!   reads are defined behavior and a losing racer's read can simply be
//!   discarded.
//! - **Single-owner enforcement by type**: the deque's owner handle is
//!   `Send + !Sync` and cannot be cloned, so the tail-side contract holds at
//!   compile time rather than by convention.
//!
//! ### Concurrency Safety
//! - **Lock-free algorithms**: every loop is a CAS retry bounded by actual
//!   contention; nothing blocks on a condition variable or OS lock.
//! - **Memory barriers**: each operation fixes its own acquire/release/seq-cst
//!   orderings; none of them are caller-configurable, because weakening any of
//!   them reintroduces lost-update and duplicate-delivery races.
//! - **ABA prevention**: cursors only ever move forward, so a stale
//!   compare-exchange can fail but never succeed against a recycled value.
//!
//! ## Architecture
//!
//! 1. **Atomic facade** ([`sync`]): re-exports the native atomics, or `loom`'s
//!    model-checked atomics when the `loom` feature is enabled. The rest of
//!    the crate only touches atomics through this module.
//! 2. **Primitive adapter** ([`atomic`]): a test-and-set [`SpinFlag`] as the
//!    most primitive mutual-exclusion building block, and the CAS-retry
//!    read-modify-write helper the higher layers share.
//! 3. **Work-stealing deque** ([`worklist`]): a bounded power-of-two ring with
//!    one owner pushing and popping the tail and any number of thieves
//!    claiming the head.
//! 4. **Bitmap allocator** ([`alloc`]): word-packed free/used flags over
//!    caller-owned storage, handing out slot indices with CAS retries.
//!
//! ## Example
//!
//! ```rust
//! use weft::worklist::{steal_deque, Steal};
//!
//! let (worker, stealer) = steal_deque(64);
//! worker.push_tail(1).unwrap();
//! worker.push_tail(2).unwrap();
//!
//! // The owner treats its own end as a stack.
//! assert_eq!(worker.take_tail(), Some(2));
//!
//! // Thieves claim the opposite end.
//! match stealer.steal() {
//!     Steal::Success(v) => assert_eq!(v, 1),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod alloc;
pub mod atomic;
pub mod sync;
pub mod worklist;

pub use alloc::{BitmapAllocator, InitError};
pub use atomic::SpinFlag;
pub use worklist::{steal_deque, Full, Steal, Stealer, Worker};
