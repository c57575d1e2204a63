//! Atomic building blocks beneath the lock-free structures.
//!
//! Two pieces live here:
//! - [`SpinFlag`], a test-and-set flag. It is the most primitive
//!   mutual-exclusion mechanism in the crate and exists as an explicit,
//!   caller-owned value rather than hidden process-wide state.
//! - [`rmw`], the compare-and-swap retry loop that turns a pure transformation
//!   into an atomic read-modify-write. The bitmap allocator runs its alloc and
//!   free paths through it, and the derived fetch operations are the same loop
//!   with fixed transformations.

/// Test-and-set flag.
pub mod flag;
/// Read-modify-write synthesis from compare-and-swap.
pub mod rmw;

pub use flag::SpinFlag;
