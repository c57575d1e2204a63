//! A fixed-capacity work-stealing deque.
//!
//! Properties:
//! - Single owner: `push_tail` / `take_tail` through the [`Worker`] handle
//! - Multiple thieves: `steal` through cloneable [`Stealer`] handles
//! - Fixed capacity, power-of-two ring buffer
//!
//! The ring stores word-sized payloads and uses atomics for the buffer as well
//! as the `head`/`tail` cursors: a thief that loses the claiming race has read
//! a slot it does not own, and that read must be discardable without UB.
//!
//! Cursors are 32-bit and compared as **signed** values. `take_tail` reserves
//! an item by decrementing `tail` before checking for emptiness, so on a fresh
//! deque the cursor wraps to `u32::MAX`; an unsigned comparison would classify
//! that as a full deque, while the signed comparison reads it as -1 and
//! correctly reports empty.

use core::cell::Cell;
use core::marker::PhantomData;
use std::sync::Arc;

use crossbeam_utils::CachePadded;

use crate::sync::{fence, AtomicU32, AtomicUsize, Ordering};

/// Largest supported capacity.
///
/// Cursor arithmetic is signed 32-bit, so the distance between `head` and
/// `tail` must stay well inside `i32` range.
pub const MAX_CAPACITY: usize = 1 << 30;

/// Outcome of a [`Stealer::steal`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steal {
    /// The thief claimed this value.
    Success(usize),
    /// The deque was observed empty.
    Empty,
    /// Lost the claiming race to another thief or to the owner; retrying may
    /// succeed immediately.
    Retry,
}

/// Error returned by [`Worker::push_tail`] on a full deque.
///
/// Carries the rejected value back to the caller, who must apply backpressure
/// (for example, divert to an overflow queue); the push is not retried
/// internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full(pub usize);

struct RingState {
    head: CachePadded<AtomicU32>,
    tail: CachePadded<AtomicU32>,
    buffer: Box<[AtomicUsize]>,
    mask: u32,
}

impl RingState {
    #[inline(always)]
    fn slot(&self, cursor: u32) -> &AtomicUsize {
        &self.buffer[(cursor & self.mask) as usize]
    }
}

// Cursor comparisons are signed; see the module docs.
#[inline(always)]
#[allow(clippy::cast_possible_wrap)]
fn signed(cursor: u32) -> i32 {
    cursor as i32
}

/// The owning side of the deque.
///
/// Exactly one thread at a time may drive a `Worker`: it is `Send` but
/// deliberately not `Sync` and not `Clone`. The owner pushes and pops the tail
/// end as an uncontended stack.
pub struct Worker {
    ring: Arc<RingState>,
    _not_sync: PhantomData<Cell<()>>,
}

/// The thieving side of the deque.
///
/// Any number of `Stealer` clones may race the owner and each other for the
/// head end.
pub struct Stealer {
    ring: Arc<RingState>,
}

/// Creates a deque with `capacity` slots, returning the owner handle and one
/// thief handle.
///
/// Both cursors start at zero and every slot is zeroed.
///
/// # Panics
///
/// Panics if `capacity` is zero, not a power of two, or greater than
/// [`MAX_CAPACITY`].
pub fn steal_deque(capacity: usize) -> (Worker, Stealer) {
    assert!(capacity.is_power_of_two());
    assert!(capacity != 0);
    assert!(capacity <= MAX_CAPACITY);

    let buffer: Box<[AtomicUsize]> = (0..capacity).map(|_| AtomicUsize::new(0)).collect();
    // Capacity is bounded above, so the mask always fits in 32 bits.
    #[allow(clippy::cast_possible_truncation)]
    let mask = (capacity - 1) as u32;
    let ring = Arc::new(RingState {
        head: CachePadded::new(AtomicU32::new(0)),
        tail: CachePadded::new(AtomicU32::new(0)),
        buffer,
        mask,
    });

    (
        Worker {
            ring: Arc::clone(&ring),
            _not_sync: PhantomData,
        },
        Stealer { ring },
    )
}

impl Worker {
    /// Pushes `value` onto the tail end.
    ///
    /// # Errors
    ///
    /// Returns [`Full`] with the rejected value when the deque already holds
    /// `capacity` items.
    pub fn push_tail(&self, value: usize) -> Result<(), Full> {
        let ring = &*self.ring;

        let tail = ring.tail.load(Ordering::Relaxed);
        let head = ring.head.load(Ordering::Acquire);

        if tail.wrapping_sub(head) as usize >= ring.buffer.len() {
            return Err(Full(value));
        }

        ring.slot(tail).store(value, Ordering::Relaxed);
        // Publish the element before making it stealable via `tail`.
        fence(Ordering::Release);
        ring.tail.store(tail.wrapping_add(1), Ordering::Relaxed);

        Ok(())
    }

    /// Pops the most recently pushed item from the tail end.
    ///
    /// Returns `None` when the deque is empty, or when a thief won the race
    /// for the final item.
    pub fn take_tail(&self) -> Option<usize> {
        let ring = &*self.ring;

        // Reserve the slot before checking emptiness; on a fresh deque this
        // wraps to u32::MAX, which the signed comparison reads as -1.
        let tail = ring.tail.load(Ordering::Relaxed).wrapping_sub(1);
        ring.tail.store(tail, Ordering::Relaxed);
        fence(Ordering::SeqCst);
        let head = ring.head.load(Ordering::Relaxed);

        if signed(head) <= signed(tail) {
            // Not empty.
            let value = ring.slot(tail).load(Ordering::Relaxed);

            if head == tail {
                // Last item: ownership moves by advancing `head` rather than
                // by the tail decrement, so thieves racing for this same slot
                // are resolved by a single CAS.
                let won = ring
                    .head
                    .compare_exchange(
                        head,
                        head.wrapping_add(1),
                        Ordering::SeqCst,
                        Ordering::Relaxed,
                    )
                    .is_ok();

                // Win or lose, undo the tail reservation.
                ring.tail.store(tail.wrapping_add(1), Ordering::Relaxed);

                if !won {
                    return None;
                }
            }

            Some(value)
        } else {
            // Empty. Undo the reservation.
            ring.tail.store(tail.wrapping_add(1), Ordering::Relaxed);
            None
        }
    }

    /// Mints another thief handle for this deque.
    pub fn stealer(&self) -> Stealer {
        Stealer {
            ring: Arc::clone(&self.ring),
        }
    }

    /// Number of slots in the ring.
    pub fn capacity(&self) -> usize {
        self.ring.buffer.len()
    }

    /// Owner-side size hint.
    ///
    /// Concurrent steals may have advanced `head` by the time the caller acts
    /// on the result; the value is exact only while no thief is active.
    pub fn len(&self) -> usize {
        let tail = self.ring.tail.load(Ordering::Relaxed);
        let head = self.ring.head.load(Ordering::Relaxed);
        usize::try_from(signed(tail.wrapping_sub(head)).max(0)).unwrap_or(0)
    }

    /// Whether the owner observes the deque as empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Stealer {
    /// Attempts to claim the item at the head end.
    ///
    /// The slot is read *before* the claiming CAS commits; a losing racer's
    /// read is discarded and never surfaced, so every pushed item is delivered
    /// at most once across all thieves and the owner.
    pub fn steal(&self) -> Steal {
        let ring = &*self.ring;

        let head = ring.head.load(Ordering::Acquire);
        fence(Ordering::SeqCst);
        let tail = ring.tail.load(Ordering::Acquire);

        if signed(head) >= signed(tail) {
            return Steal::Empty;
        }

        // Provisional read; only surfaced if the CAS below wins.
        let value = ring.slot(head).load(Ordering::Relaxed);

        if ring
            .head
            .compare_exchange(
                head,
                head.wrapping_add(1),
                Ordering::SeqCst,
                Ordering::Relaxed,
            )
            .is_err()
        {
            return Steal::Retry;
        }

        Steal::Success(value)
    }
}

impl Clone for Stealer {
    fn clone(&self) -> Self {
        Self {
            ring: Arc::clone(&self.ring),
        }
    }
}
