#![cfg(not(feature = "loom"))]

use weft::alloc::{BitmapAllocator, InitError};
use weft::sync::{AtomicU32, Ordering};

fn storage(words: usize) -> Vec<AtomicU32> {
    // Seeded with garbage so tests prove init really zeroes it.
    (0..words).map(|_| AtomicU32::new(u32::MAX)).collect()
}

#[test]
fn init_validates_arguments() {
    let words = storage(2);
    assert_eq!(
        BitmapAllocator::init(&words, 33).unwrap_err(),
        InitError::UnalignedBitCount
    );
    assert_eq!(
        BitmapAllocator::init(&words, 32).unwrap_err(),
        InitError::StorageMismatch
    );
    assert!(BitmapAllocator::init(&words, 64).is_ok());
}

#[test]
fn init_marks_every_slot_free() {
    let words = storage(2);
    let bitmap = BitmapAllocator::init(&words, 64).unwrap();
    assert_eq!(bitmap.size_in_bits(), 64);
    assert_eq!(bitmap.size_in_words(), 2);
    assert_eq!(bitmap.alloc(), Some(0));
}

#[test]
fn allocation_is_msb_first() {
    let words = storage(1);
    let bitmap = BitmapAllocator::init(&words, 32).unwrap();
    assert_eq!(bitmap.alloc(), Some(0));
    assert_eq!(words[0].load(Ordering::Relaxed), 0x8000_0000);
    assert_eq!(bitmap.alloc(), Some(1));
    assert_eq!(words[0].load(Ordering::Relaxed), 0xC000_0000);

    bitmap.free(0);
    assert_eq!(words[0].load(Ordering::Relaxed), 0x4000_0000);
}

#[test]
fn round_trip_64_slots() {
    let words = storage(2);
    let bitmap = BitmapAllocator::init(&words, 64).unwrap();

    for expected in 0..64 {
        assert_eq!(bitmap.alloc(), Some(expected));
    }
    assert_eq!(bitmap.alloc(), None);

    bitmap.free(37);
    assert_eq!(bitmap.alloc(), Some(37));
    assert_eq!(bitmap.alloc(), None);
}

#[test]
fn copies_share_the_pool() {
    let words = storage(1);
    let bitmap = BitmapAllocator::init(&words, 32).unwrap();
    let view = bitmap;
    assert_eq!(bitmap.alloc(), Some(0));
    assert_eq!(view.alloc(), Some(1));
}

#[test]
#[should_panic(expected = "double free")]
fn double_free_is_fatal() {
    let words = storage(1);
    let bitmap = BitmapAllocator::init(&words, 32).unwrap();
    let index = bitmap.alloc().unwrap();
    bitmap.free(index);
    bitmap.free(index);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "out of bounds")]
fn out_of_range_free_asserts_in_debug() {
    let words = storage(1);
    let bitmap = BitmapAllocator::init(&words, 32).unwrap();
    bitmap.free(32);
}

#[cfg(not(debug_assertions))]
#[test]
fn out_of_range_free_is_ignored_in_release() {
    let words = storage(1);
    let bitmap = BitmapAllocator::init(&words, 32).unwrap();
    bitmap.free(32);
    assert_eq!(bitmap.alloc(), Some(0));
}

#[test]
fn concurrent_alloc_hands_out_each_slot_once() {
    const BITS: usize = 64;

    let words = storage(2);
    let bitmap = BitmapAllocator::init(&words, BITS).unwrap();

    let mut claimed = vec![false; BITS];
    let mut total = 0usize;

    std::thread::scope(|s| {
        let mut handles = Vec::new();
        for _ in 0..8 {
            handles.push(s.spawn(move || {
                let mut got = Vec::new();
                while let Some(index) = bitmap.alloc() {
                    got.push(index);
                }
                got
            }));
        }

        for h in handles {
            for index in h.join().unwrap() {
                assert!(index < BITS);
                assert!(!claimed[index], "slot {index} handed out twice");
                claimed[index] = true;
                total += 1;
            }
        }
    });

    // More threads than slots: exactly the pool size succeeds, the rest
    // observe exhaustion.
    assert_eq!(total, BITS);
    assert_eq!(bitmap.alloc(), None);
}

#[test]
fn concurrent_churn_keeps_slots_consistent() {
    const BITS: usize = 32;

    let words = storage(1);
    let bitmap = BitmapAllocator::init(&words, BITS).unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(move || {
                for _ in 0..2_000 {
                    if let Some(index) = bitmap.alloc() {
                        assert!(index < BITS);
                        bitmap.free(index);
                    }
                }
            });
        }
    });

    // Every thread freed what it claimed, so the pool must be whole again.
    for expected in 0..BITS {
        assert_eq!(bitmap.alloc(), Some(expected));
    }
    assert_eq!(bitmap.alloc(), None);
}
