//! Read-modify-write synthesis from compare-and-swap.
//!
//! [`fetch_update`] is the one retry loop in the crate: load, apply a pure
//! transformation, attempt a weak compare-exchange, repeat until it commits or
//! the transformation declines. The fetch operations below are fixed
//! transformations run through the same loop, and the bitmap allocator's
//! alloc/free paths are two more instances of it.

use crate::sync::{AtomicU32, Ordering};

/// Atomically applies `f` to `cell` until the update commits.
///
/// `f` receives the freshest observed value and returns the replacement, or
/// `None` to decline the update. The loop is bounded only by contention: a
/// failed compare-exchange means another thread changed the word, and the
/// transformation is re-applied to the new value.
///
/// # Errors
///
/// Returns `Err(current)` with the last observed value when `f` declines.
/// On success, returns `Ok(previous)` with the value the update replaced.
#[inline]
pub fn fetch_update<F>(
    cell: &AtomicU32,
    set_order: Ordering,
    fetch_order: Ordering,
    mut f: F,
) -> Result<u32, u32>
where
    F: FnMut(u32) -> Option<u32>,
{
    let mut prev = cell.load(fetch_order);
    while let Some(next) = f(prev) {
        match cell.compare_exchange_weak(prev, next, set_order, fetch_order) {
            Ok(previous) => return Ok(previous),
            Err(current) => prev = current,
        }
    }
    Err(prev)
}

/// Atomically adds `value`, wrapping on overflow. Returns the previous value.
#[inline]
pub fn fetch_add(cell: &AtomicU32, value: u32, order: Ordering) -> u32 {
    committed(fetch_update(cell, order, Ordering::Relaxed, |w| {
        Some(w.wrapping_add(value))
    }))
}

/// Atomically subtracts `value`, wrapping on underflow. Returns the previous value.
#[inline]
pub fn fetch_sub(cell: &AtomicU32, value: u32, order: Ordering) -> u32 {
    committed(fetch_update(cell, order, Ordering::Relaxed, |w| {
        Some(w.wrapping_sub(value))
    }))
}

/// Atomically ORs in `value`. Returns the previous value.
#[inline]
pub fn fetch_or(cell: &AtomicU32, value: u32, order: Ordering) -> u32 {
    committed(fetch_update(cell, order, Ordering::Relaxed, |w| Some(w | value)))
}

/// Atomically ANDs in `value`. Returns the previous value.
#[inline]
pub fn fetch_and(cell: &AtomicU32, value: u32, order: Ordering) -> u32 {
    committed(fetch_update(cell, order, Ordering::Relaxed, |w| Some(w & value)))
}

/// Atomically XORs in `value`. Returns the previous value.
#[inline]
pub fn fetch_xor(cell: &AtomicU32, value: u32, order: Ordering) -> u32 {
    committed(fetch_update(cell, order, Ordering::Relaxed, |w| Some(w ^ value)))
}

// A transformation that never declines always commits.
#[inline(always)]
fn committed(result: Result<u32, u32>) -> u32 {
    match result {
        Ok(previous) | Err(previous) => previous,
    }
}
