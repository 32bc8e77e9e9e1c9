//! Allocation and collection types for Mosaic.
//!
//! This module provides:
//! - [`arena::Arena`], a bump allocator over a reserved range
//! - [`registry::Registry`], an open-addressing map keyed by identity hashes
//! - [`sparse_set::SparseSet`], generational slots with a free list
//! - Re-exports of AHash collections for incidental maps

pub mod arena;
pub mod registry;
pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(42);
        assert!(set.contains(&42));
    }
}
