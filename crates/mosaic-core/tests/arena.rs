//! Arena behaviour across allocate / reset cycles.

use mosaic_core::alloc::arena::{Arena, ArenaError, ArenaStrategy, PAGE_SIZE};
use proptest::prelude::*;
use std::alloc::Layout;

#[test]
fn test_reset_rewinds_to_zero_and_reuses_addresses() {
    let mut arena = Arena::with_reserve(1 << 20);
    let first = arena.alloc_bytes(64, 8).as_ptr() as usize;
    arena.alloc_bytes(PAGE_SIZE * 2, 16);
    assert!(arena.used() > PAGE_SIZE * 2);

    arena.reset();
    assert_eq!(arena.used(), 0);
    let again = arena.alloc_bytes(64, 8).as_ptr() as usize;
    assert_eq!(first, again);
}

#[test]
fn test_virtual_growth_is_page_granular_and_bounded() {
    let reserve = PAGE_SIZE * 10;
    let arena = Arena::new(ArenaStrategy::Virtual, reserve);

    let mut last_committed = 0;
    while arena
        .try_alloc_layout(Layout::from_size_align(700, 8).unwrap())
        .is_ok()
    {
        assert_eq!(arena.committed() % PAGE_SIZE, 0);
        assert!(arena.committed() >= last_committed);
        assert!(arena.used() <= arena.committed());
        last_committed = arena.committed();
    }

    assert!(arena.committed() <= arena.capacity());
    assert_eq!(arena.capacity(), reserve);
}

#[test]
fn test_exhaustion_reports_ceiling() {
    let arena = Arena::fixed(PAGE_SIZE * 2);
    arena.alloc_bytes(PAGE_SIZE, 8);
    let err = arena
        .try_alloc_layout(Layout::from_size_align(PAGE_SIZE * 2, 8).unwrap())
        .unwrap_err();
    assert!(matches!(err, ArenaError::OutOfReserve { capacity, .. } if capacity == PAGE_SIZE * 2));
    assert!(err.to_string().contains("ceiling"));
}

#[test]
fn test_slices_stay_valid_together() {
    let arena = Arena::with_reserve(PAGE_SIZE * 64);
    let a = arena.alloc_slice_fill_iter(1000, 0u32..);
    let b = arena.alloc_slice_copy(&[7u8; 5000]);
    a[999] = 1;
    b[0] = 1;
    assert_eq!(a[998], 998);
    assert_eq!(b[4999], 7);
}

proptest! {
    #[test]
    fn prop_allocations_never_overlap(
        requests in prop::collection::vec((1usize..512, 0u32..7), 1..200),
    ) {
        let mut arena = Arena::with_reserve(1 << 20);
        for _ in 0..2 {
            let mut ranges: Vec<(usize, usize)> = Vec::new();
            let mut previous_used = arena.used();

            for &(size, align_pow) in &requests {
                let align = 1usize << align_pow;
                let ptr = arena.alloc_bytes(size, align).as_ptr() as usize;
                prop_assert_eq!(ptr % align, 0);
                prop_assert!(arena.used() >= previous_used);
                prop_assert!(arena.used() <= arena.committed());
                previous_used = arena.used();
                ranges.push((ptr, ptr + size));
            }

            ranges.sort_unstable();
            for pair in ranges.windows(2) {
                prop_assert!(pair[0].1 <= pair[1].0);
            }

            arena.reset();
            prop_assert_eq!(arena.used(), 0);
        }
    }
}
