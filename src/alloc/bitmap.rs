//! A concurrent bitmap slot allocator.
//!
//! Hands out small integer indices from a fixed pool without locking. Each bit
//! of the caller-supplied storage is one slot (1 = used, 0 = free), and every
//! transition goes through a CAS that observed the prior value, so two threads
//! can never claim the same slot.
//!
//! Bit index 0 is the most significant bit of word 0: allocation scans each
//! word for the first zero from the high bit down, and `free` uses the same
//! convention. The allocator is a thin view over storage it does not own;
//! contention scales with allocation churn, not with pool size.

use crate::atomic::rmw;
use crate::sync::{AtomicU32, Ordering};

const WORD_BITS: usize = 32;
const TOP_BIT: u32 = 0x8000_0000;

/// Error returned by [`BitmapAllocator::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The requested bit count is not a multiple of 32.
    UnalignedBitCount,
    /// The storage slice does not hold exactly the requested bit count.
    StorageMismatch,
}

/// A lock-free allocator of slot indices backed by caller-owned words.
///
/// The allocator is `Copy`: it is only a view, and every copy shares the same
/// pool. Dropping it leaves the storage untouched.
#[derive(Debug, Clone, Copy)]
pub struct BitmapAllocator<'a> {
    words: &'a [AtomicU32],
}

impl<'a> BitmapAllocator<'a> {
    /// Creates an allocator over `storage`, marking every slot free.
    ///
    /// `size_in_bits` is the number of slots and must be a multiple of 32
    /// matching `storage.len() * 32` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] when the bit count is unaligned or does not
    /// match the storage slice.
    pub fn init(storage: &'a [AtomicU32], size_in_bits: usize) -> Result<Self, InitError> {
        if size_in_bits % WORD_BITS != 0 {
            return Err(InitError::UnalignedBitCount);
        }
        if storage.len() * WORD_BITS != size_in_bits {
            return Err(InitError::StorageMismatch);
        }

        for word in storage {
            word.store(0, Ordering::Relaxed);
        }

        Ok(Self { words: storage })
    }

    /// Number of slots.
    pub fn size_in_bits(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Number of backing words.
    pub fn size_in_words(&self) -> usize {
        self.words.len()
    }

    /// Claims a free slot and returns its index.
    ///
    /// Scans words in order and CAS-claims the first zero bit found; a failed
    /// CAS reloads and retries the same word, a word observed all-ones is
    /// skipped. Returns `None` once every word has been observed full.
    pub fn alloc(&self) -> Option<usize> {
        for (word_index, word) in self.words.iter().enumerate() {
            let claimed = rmw::fetch_update(word, Ordering::AcqRel, Ordering::Relaxed, |old| {
                if old == u32::MAX {
                    None
                } else {
                    Some(old | (TOP_BIT >> (!old).leading_zeros()))
                }
            });

            if let Ok(old) = claimed {
                let bit_index = (!old).leading_zeros() as usize;
                return Some(word_index * WORD_BITS + bit_index);
            }
        }

        None
    }

    /// Releases a previously allocated slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already free (a double free). An out-of-range
    /// `index` is asserted in debug builds and ignored in release builds;
    /// both are caller programming errors, not runtime conditions.
    pub fn free(&self, index: usize) {
        let word_index = index / WORD_BITS;
        let mask = TOP_BIT >> (index % WORD_BITS);

        if word_index >= self.words.len() {
            debug_assert!(false, "bitmap free: index {index} out of bounds");
            return;
        }

        let _ = rmw::fetch_update(
            &self.words[word_index],
            Ordering::AcqRel,
            Ordering::Relaxed,
            |old| {
                assert!((old & mask) != 0, "bitmap free: double free of slot {index}");
                Some(old & !mask)
            },
        );
    }
}
