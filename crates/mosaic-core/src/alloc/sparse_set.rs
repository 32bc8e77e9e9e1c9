//! Generational slot pool.
//!
//! Freed slots are pushed onto a free stack and handed out again by the next
//! [`SparseSet::push`]. Each reuse bumps the slot generation, so a stale
//! [`IndexSlot`] is detected instead of silently aliasing the new occupant.

use crate::profiling::profile_function;
use std::num::NonZeroU64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexSlot(NonZeroU64);

impl IndexSlot {
    pub fn new(generation: u32, idx: u32) -> Self {
        debug_assert!(idx < u32::MAX, "slot index space exhausted");
        // SAFETY: the low half stores `idx + 1`, which is never zero.
        Self(unsafe {
            NonZeroU64::new_unchecked(((generation as u64) << 32) | (idx as u64 + 1))
        })
    }

    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    pub fn index(&self) -> u32 {
        (self.0.get() & u32::MAX as u64) as u32 - 1
    }

    /// Packed representation, stable for the lifetime of the slot.
    pub fn to_bits(&self) -> u64 {
        self.0.get()
    }
}

struct Entry<T> {
    generation: u32,
    data: Option<T>,
}

pub struct SparseSet<T> {
    vec: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> SparseSet<T> {
    pub const fn new() -> Self {
        Self {
            vec: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vec: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store `data`, recycling the most recently freed slot when there is one.
    pub fn push(&mut self, data: T) -> IndexSlot {
        profile_function!();
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let entry = &mut self.vec[idx as usize];
            debug_assert!(entry.data.is_none(), "free list points at a live slot");
            entry.data = Some(data);
            IndexSlot::new(entry.generation, idx)
        } else {
            let idx = self.vec.len();
            self.vec.push(Entry {
                generation: 0,
                data: Some(data),
            });
            IndexSlot::new(0, idx as u32)
        }
    }

    pub fn get(&self, idx: IndexSlot) -> &T {
        match self.try_get(idx) {
            Some(data) => data,
            None => panic!("invalid generation, use after free! ({idx:?})"),
        }
    }

    pub fn get_mut(&mut self, idx: IndexSlot) -> &mut T {
        match self.try_get_mut(idx) {
            Some(data) => data,
            None => panic!("invalid generation, use after free! ({idx:?})"),
        }
    }

    pub fn try_get(&self, idx: IndexSlot) -> Option<&T> {
        self.vec
            .get(idx.index() as usize)
            .filter(|entry| entry.generation == idx.generation())
            .and_then(|entry| entry.data.as_ref())
    }

    pub fn try_get_mut(&mut self, idx: IndexSlot) -> Option<&mut T> {
        self.vec
            .get_mut(idx.index() as usize)
            .filter(|entry| entry.generation == idx.generation())
            .and_then(|entry| entry.data.as_mut())
    }

    pub fn contains(&self, idx: IndexSlot) -> bool {
        self.try_get(idx).is_some()
    }

    /// Take the value out and recycle its slot.
    ///
    /// Panics if `idx` is stale.
    pub fn remove(&mut self, idx: IndexSlot) -> T {
        profile_function!();
        let index = idx.index();
        let entry = match self.vec.get_mut(index as usize) {
            Some(entry) if entry.generation == idx.generation() && entry.data.is_some() => entry,
            _ => panic!("invalid generation, use after free! ({idx:?})"),
        };
        let data = entry.data.take();
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        match data {
            Some(data) => data,
            None => unreachable!(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of recycled slots waiting to be reused.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Drop every value, invalidating all outstanding handles.
    pub fn clear(&mut self) {
        for (idx, entry) in self.vec.iter_mut().enumerate() {
            if entry.data.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(idx as u32);
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.vec.iter().filter_map(|entry| entry.data.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.vec.iter_mut().filter_map(|entry| entry.data.as_mut())
    }

    /// Live values together with their handles, in slot order.
    pub fn iter_slots(&self) -> impl Iterator<Item = (IndexSlot, &T)> + '_ {
        self.vec.iter().enumerate().filter_map(|(idx, entry)| {
            entry
                .data
                .as_ref()
                .map(|data| (IndexSlot::new(entry.generation, idx as u32), data))
        })
    }
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_eq_size!(IndexSlot, Option<IndexSlot>);
