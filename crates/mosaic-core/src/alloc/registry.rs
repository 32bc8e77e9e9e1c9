//! Open-addressing identity registry.
//!
//! Maps a 64-bit identity hash to an owned value with linear probing. Removed
//! entries leave a [`TOMBSTONE`] behind so later probes keep walking past them.
//!
//! Bucket storage lives in two arenas reserved up front. Growing rehashes
//! into the idle arena and decommits the one that was active, so the bucket
//! array is never moved by a `realloc`; the decommitted arena hands its
//! touched pages back and reserves afresh.

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};

use super::arena::Arena;
use crate::config::RegistryConfig;
use crate::profiling::{profile_function, profile_scope};

/// Key of a bucket that has never held an entry.
pub const FREE: u64 = u64::MAX;
/// Key of a bucket whose entry was removed.
pub const TOMBSTONE: u64 = u64::MAX - 1;

/// Maximum load, as a fraction of `LOAD_DEN`.
const LOAD_NUM: usize = 7;
const LOAD_DEN: usize = 10;

struct Bucket<T> {
    key: u64,
    value: MaybeUninit<T>,
}

impl<T> Bucket<T> {
    fn is_live(&self) -> bool {
        self.key != FREE && self.key != TOMBSTONE
    }
}

enum Probe {
    Found(usize),
    Vacant(usize),
}

pub struct Registry<T> {
    buffers: [Arena; 2],
    active: usize,
    buckets: NonNull<Bucket<T>>,
    capacity: usize,
    /// Live entries plus tombstones.
    used: usize,
    len: usize,
    max_capacity: usize,
    _owns: PhantomData<T>,
}

impl<T> Registry<T> {
    pub fn new(config: RegistryConfig) -> Self {
        let RegistryConfig {
            initial_capacity,
            max_capacity,
        } = config;
        assert!(initial_capacity > 0, "registry capacity must be non-zero");
        assert!(
            initial_capacity <= max_capacity,
            "registry initial capacity {initial_capacity} exceeds its ceiling {max_capacity}"
        );

        let reserve = match Layout::array::<Bucket<T>>(max_capacity) {
            Ok(layout) => layout.size() + layout.align(),
            Err(err) => panic!("registry ceiling of {max_capacity} buckets is too large: {err}"),
        };
        let buffers = [Arena::with_reserve(reserve), Arena::with_reserve(reserve)];
        let buckets = alloc_buckets::<T>(&buffers[0], initial_capacity);

        Self {
            buffers,
            active: 0,
            buckets,
            capacity: initial_capacity,
            used: 0,
            len: 0,
            max_capacity,
            _owns: PhantomData,
        }
    }

    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self::new(RegistryConfig::default().initial_capacity(initial_capacity))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Occupied buckets (live and tombstoned) over capacity.
    pub fn load_factor(&self) -> f32 {
        self.used as f32 / self.capacity as f32
    }

    /// Insert or overwrite. Returns the previous value stored under `key`.
    ///
    /// Panics if `key` is one of the reserved sentinels.
    pub fn insert(&mut self, key: u64, value: T) -> Option<T> {
        profile_function!();
        assert!(
            key < TOMBSTONE,
            "registry key {key:#x} collides with a reserved sentinel"
        );

        let mut index = match self.probe(key) {
            Probe::Found(index) => {
                // SAFETY: a found bucket is live, so its value is initialised.
                let slot = unsafe { self.buckets_mut()[index].value.assume_init_mut() };
                return Some(mem::replace(slot, value));
            }
            Probe::Vacant(index) => index,
        };

        let takes_free_bucket = self.buckets()[index].key == FREE;
        if takes_free_bucket && (self.used + 1) * LOAD_DEN > self.capacity * LOAD_NUM {
            self.grow();
            index = match self.probe(key) {
                Probe::Vacant(index) => index,
                Probe::Found(_) => unreachable!("key appeared during rehash"),
            };
        }

        if self.buckets()[index].key == FREE {
            self.used += 1;
        }
        let bucket = &mut self.buckets_mut()[index];
        bucket.key = key;
        bucket.value.write(value);
        self.len += 1;
        None
    }

    pub fn find(&self, key: u64) -> Option<&T> {
        match self.probe(key) {
            // SAFETY: found buckets are live.
            Probe::Found(index) => Some(unsafe { self.buckets()[index].value.assume_init_ref() }),
            Probe::Vacant(_) => None,
        }
    }

    pub fn find_mut(&mut self, key: u64) -> Option<&mut T> {
        match self.probe(key) {
            // SAFETY: found buckets are live.
            Probe::Found(index) => {
                Some(unsafe { self.buckets_mut()[index].value.assume_init_mut() })
            }
            Probe::Vacant(_) => None,
        }
    }

    pub fn contains(&self, key: u64) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Remove `key`, leaving a tombstone in its bucket.
    pub fn remove(&mut self, key: u64) -> Option<T> {
        let Probe::Found(index) = self.probe(key) else {
            return None;
        };
        let bucket = &mut self.buckets_mut()[index];
        bucket.key = TOMBSTONE;
        // SAFETY: the bucket was live; its key is now a tombstone so the value is never read again.
        let value = unsafe { bucket.value.assume_init_read() };
        self.len -= 1;
        Some(value)
    }

    /// Drop every entry and return all buckets to `FREE`.
    pub fn clear(&mut self) {
        for bucket in self.buckets_mut() {
            if bucket.is_live() {
                // SAFETY: live buckets hold an initialised value.
                unsafe { bucket.value.assume_init_drop() };
            }
            bucket.key = FREE;
        }
        self.used = 0;
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        self.buckets()
            .iter()
            .filter(|bucket| bucket.is_live())
            // SAFETY: filtered to live buckets.
            .map(|bucket| (bucket.key, unsafe { bucket.value.assume_init_ref() }))
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter().map(|(key, _)| key)
    }

    fn probe(&self, key: u64) -> Probe {
        let buckets = self.buckets();
        let mut index = (key % self.capacity as u64) as usize;
        let mut first_tombstone = None;

        for _ in 0..self.capacity {
            match buckets[index].key {
                FREE => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                TOMBSTONE => {
                    first_tombstone.get_or_insert(index);
                }
                found if found == key => return Probe::Found(index),
                _ => {}
            }
            index = (index + 1) % self.capacity;
        }

        match first_tombstone {
            Some(index) => Probe::Vacant(index),
            None => panic!("registry probe wrapped without finding a vacant bucket"),
        }
    }

    fn grow(&mut self) {
        profile_function!();
        let new_capacity = if self.len >= self.capacity / 2 {
            self.capacity * 2
        } else {
            // Mostly tombstones: rehash at the same size to sweep them out.
            self.capacity
        };
        if new_capacity > self.max_capacity {
            tracing::error!(
                requested = new_capacity,
                max = self.max_capacity,
                "registry ceiling reached"
            );
            panic!(
                "registry cannot grow to {new_capacity} buckets: reserved ceiling is {}",
                self.max_capacity
            );
        }

        let next = 1 - self.active;
        self.buffers[next].reset();
        let new_buckets = alloc_buckets::<T>(&self.buffers[next], new_capacity);
        {
            profile_scope!("rehash");
            // SAFETY: both bucket arrays are initialised for their capacities and live
            // in different arenas, so the slices never overlap.
            let (old, new) = unsafe {
                (
                    std::slice::from_raw_parts(self.buckets.as_ptr(), self.capacity),
                    std::slice::from_raw_parts_mut(new_buckets.as_ptr(), new_capacity),
                )
            };
            for bucket in old.iter().filter(|bucket| bucket.is_live()) {
                let index = free_slot(new, bucket.key);
                new[index].key = bucket.key;
                // SAFETY: moved out exactly once; the old array is decommitted below
                // without dropping anything.
                new[index]
                    .value
                    .write(unsafe { ptr::read(bucket.value.as_ptr()) });
            }
        }

        tracing::debug!(
            from = self.capacity,
            to = new_capacity,
            live = self.len,
            swept = self.used - self.len,
            "registry resize"
        );
        self.buffers[self.active].decommit();
        self.active = next;
        self.buckets = new_buckets;
        self.capacity = new_capacity;
        self.used = self.len;
    }

    fn buckets(&self) -> &[Bucket<T>] {
        // SAFETY: `buckets` points at `capacity` initialised buckets in the active arena.
        unsafe { std::slice::from_raw_parts(self.buckets.as_ptr(), self.capacity) }
    }

    fn buckets_mut(&mut self) -> &mut [Bucket<T>] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.buckets.as_ptr(), self.capacity) }
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<T> Drop for Registry<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            for bucket in self.buckets_mut() {
                if bucket.is_live() {
                    // SAFETY: live buckets hold an initialised value.
                    unsafe { bucket.value.assume_init_drop() };
                }
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (format!("{key:#018x}"), value)))
            .finish()
    }
}

fn alloc_buckets<T>(arena: &Arena, capacity: usize) -> NonNull<Bucket<T>> {
    let layout = match Layout::array::<Bucket<T>>(capacity) {
        Ok(layout) => layout,
        Err(err) => panic!("registry bucket array of {capacity} is too large: {err}"),
    };
    let buckets = arena.alloc_layout(layout).cast::<Bucket<T>>();
    for i in 0..capacity {
        // SAFETY: `i < capacity` and the region was sized for `capacity` buckets.
        unsafe {
            buckets.as_ptr().add(i).write(Bucket {
                key: FREE,
                value: MaybeUninit::uninit(),
            });
        }
    }
    buckets
}

/// First `FREE` bucket on `key`'s probe chain in a freshly built array.
fn free_slot<T>(buckets: &[Bucket<T>], key: u64) -> usize {
    let mut index = (key % buckets.len() as u64) as usize;
    while buckets[index].key != FREE {
        index = (index + 1) % buckets.len();
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_insert_find_remove() {
        let mut registry = Registry::with_capacity(8);
        assert_eq!(registry.insert(42, "a"), None);
        assert_eq!(registry.find(42), Some(&"a"));
        assert_eq!(registry.insert(42, "b"), Some("a"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove(42), Some("b"));
        assert_eq!(registry.find(42), None);
        assert!(!registry.contains(42));
    }

    #[test]
    fn test_probe_passes_tombstones() {
        let mut registry = Registry::with_capacity(8);
        // 1, 9 and 17 share home bucket 1.
        registry.insert(1, 'a');
        registry.insert(9, 'b');
        registry.insert(17, 'c');
        registry.remove(9);
        assert_eq!(registry.find(17), Some(&'c'));

        // Reinsertion reuses the tombstone rather than a fresh bucket.
        let used = registry.used;
        registry.insert(25, 'd');
        assert_eq!(registry.used, used);
        assert_eq!(registry.find(25), Some(&'d'));
    }

    #[test]
    fn test_resize_doubles_and_sweeps() {
        let mut registry = Registry::with_capacity(16);
        for key in 0..11u64 {
            registry.insert(key, key * 3);
        }
        assert_eq!(registry.capacity(), 16);
        registry.insert(11, 33);
        assert_eq!(registry.capacity(), 32);
        assert_eq!(registry.used, registry.len());
        for key in 0..12u64 {
            assert_eq!(registry.find(key), Some(&(key * 3)));
        }
    }

    #[test]
    fn test_tombstone_heavy_rehash_keeps_capacity() {
        let mut registry = Registry::with_capacity(16);
        for key in 0..11u64 {
            registry.insert(key, ());
        }
        for key in 0..10u64 {
            registry.remove(key);
        }
        registry.insert(13, ());
        assert_eq!(registry.capacity(), 16);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.used, 2);
    }

    #[test]
    #[should_panic(expected = "reserved sentinel")]
    fn test_sentinel_key_rejected() {
        let mut registry = Registry::with_capacity(4);
        registry.insert(FREE, 0);
    }

    #[test]
    #[should_panic(expected = "reserved ceiling")]
    fn test_ceiling_is_fatal() {
        let mut registry = Registry::new(RegistryConfig {
            initial_capacity: 4,
            max_capacity: 4,
        });
        for key in 0..4u64 {
            registry.insert(key, key);
        }
    }

    #[test]
    fn test_values_dropped_exactly_once() {
        let marker = Rc::new(());
        {
            let mut registry = Registry::with_capacity(4);
            for key in 0..20u64 {
                registry.insert(key, Rc::clone(&marker));
            }
            registry.remove(3);
            assert_eq!(Rc::strong_count(&marker), 20);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
