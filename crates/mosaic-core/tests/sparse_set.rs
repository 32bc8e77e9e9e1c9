//! Generational slot pool tests.
//!
//! The dock tree recycles node slots through this pool, so these tests focus
//! on free-list reuse order, generation bumps and stale-handle detection.

use mosaic_core::alloc::sparse_set::{IndexSlot, SparseSet};

#[test]
fn test_push_and_get() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    let idx2 = set.push(100);

    assert_eq!(*set.get(idx), 42);
    assert_eq!(*set.get(idx2), 100);
    assert_eq!(idx.index(), 0);
    assert_eq!(idx2.index(), 1);
}

#[test]
fn test_get_mut() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    *set.get_mut(idx) = 100;

    assert_eq!(*set.get(idx), 100);
}

#[test]
fn test_try_get_out_of_range() {
    let set = SparseSet::<i32>::new();
    assert_eq!(set.try_get(IndexSlot::new(0, 999)), None);
}

#[test]
#[should_panic(expected = "invalid generation")]
fn test_use_after_free_panics() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    set.remove(idx);
    let _ = set.get(idx);
}

#[test]
#[should_panic(expected = "invalid generation")]
fn test_double_free_panics() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    set.remove(idx);
    set.remove(idx);
}

#[test]
fn test_free_list_is_lifo() {
    let mut set = SparseSet::new();
    let a = set.push('a');
    let b = set.push('b');
    let _c = set.push('c');

    set.remove(a);
    set.remove(b);
    assert_eq!(set.free_count(), 2);

    // Most recently freed slot comes back first.
    let d = set.push('d');
    let e = set.push('e');
    assert_eq!(d.index(), b.index());
    assert_eq!(e.index(), a.index());
    assert_eq!(set.free_count(), 0);
    assert_eq!(set.len(), 3);
}

#[test]
fn test_generation_bumps_on_every_reuse() {
    let mut set = SparseSet::new();
    let mut handle = set.push(0);
    let first = handle;

    for round in 1..=4u32 {
        set.remove(handle);
        handle = set.push(round);
        assert_eq!(handle.index(), first.index());
        assert_eq!(handle.generation(), round);
    }

    assert!(!set.contains(first));
    assert_eq!(*set.get(handle), 4);
}

#[test]
fn test_iteration_skips_free_slots() {
    let mut set = SparseSet::new();

    set.push(10);
    let idx = set.push(20);
    set.push(30);
    set.remove(idx);

    let values: Vec<_> = set.iter().copied().collect();
    assert_eq!(values, vec![10, 30]);

    for value in set.iter_mut() {
        *value += 1;
    }
    let slots: Vec<_> = set.iter_slots().map(|(slot, value)| (slot.index(), *value)).collect();
    assert_eq!(slots, vec![(0, 11), (2, 31)]);
}

#[test]
fn test_many_recycles_keep_storage_bounded() {
    let mut set = SparseSet::with_capacity(8);
    let mut live: Vec<IndexSlot> = (0..8).map(|i| set.push(i)).collect();

    for i in 0..1000 {
        let victim = live.remove(i % live.len());
        set.remove(victim);
        live.push(set.push(i));
    }

    assert_eq!(set.len(), 8);
    assert!(live.iter().all(|slot| slot.index() < 8));
}

#[test]
fn test_index_slot_bits_are_unique() {
    let a = IndexSlot::new(0, 5);
    let b = IndexSlot::new(1, 5);
    let c = IndexSlot::new(0, 6);

    assert_ne!(a.to_bits(), b.to_bits());
    assert_ne!(a.to_bits(), c.to_bits());
    assert_eq!(a, IndexSlot::new(0, 5));
}
