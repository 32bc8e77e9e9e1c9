//! Page-granular bump allocator.
//!
//! An [`Arena`] reserves its whole address range once, then commits pages
//! lazily as the bump offset moves past the committed size. Individual
//! allocations are never freed; [`Arena::reset`] rewinds the offset so the
//! committed pages can be reused by the next frame.
//!
//! The reservation is one block from the global allocator. Committing only
//! advances a mark inside it; the OS backs a page when it is first written.
//!
//! Allocation goes through `&self`, so several slices handed out by the same
//! arena can be alive together. Rewinding needs `&mut self`, which the borrow
//! checker only grants once every one of those slices is gone.
//!
//! Values placed in the arena are never dropped.

use std::alloc::{self, Layout};
use std::cell::Cell;
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr::{self, NonNull};

use crate::profiling::profile_function;

/// Granularity of commits.
pub const PAGE_SIZE: usize = 4096;

/// How an arena commits its reserved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArenaStrategy {
    /// Commit the whole reservation up front.
    Fixed,
    /// Commit page-aligned chunks on demand, at least doubling each time.
    #[default]
    Virtual,
}

/// Failure to carve an allocation out of the reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// The allocation would end past the reserved ceiling.
    OutOfReserve {
        /// Offset the allocation would end at.
        requested: usize,
        /// Reserved ceiling in bytes.
        capacity: usize,
    },
    /// Size arithmetic overflowed `usize`.
    LayoutOverflow,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::OutOfReserve {
                requested,
                capacity,
            } => write!(
                f,
                "arena reservation exhausted: allocation ends at {requested} bytes, \
                 ceiling is {capacity} bytes"
            ),
            ArenaError::LayoutOverflow => write!(f, "arena allocation size overflowed"),
        }
    }
}

impl std::error::Error for ArenaError {}

pub type ArenaResult<T> = Result<T, ArenaError>;

pub struct Arena {
    base: NonNull<u8>,
    reservation: Layout,
    strategy: ArenaStrategy,
    used: Cell<usize>,
    committed: Cell<usize>,
}

impl Arena {
    /// Reserve `capacity` bytes (rounded up to whole pages).
    ///
    /// Panics if `capacity` is zero or the reservation itself fails.
    pub fn new(strategy: ArenaStrategy, capacity: usize) -> Self {
        assert!(capacity > 0, "arena capacity must be non-zero");
        let capacity = match round_up(capacity, PAGE_SIZE) {
            Some(capacity) => capacity,
            None => panic!("arena capacity {capacity} overflows when rounded to pages"),
        };
        let reservation = match Layout::from_size_align(capacity, PAGE_SIZE) {
            Ok(layout) => layout,
            Err(err) => panic!("invalid arena reservation of {capacity} bytes: {err}"),
        };

        let arena = Self {
            base: reserve(reservation),
            reservation,
            strategy,
            used: Cell::new(0),
            committed: Cell::new(0),
        };
        if strategy == ArenaStrategy::Fixed {
            arena.commit_to(capacity);
        }
        tracing::debug!(?strategy, capacity, "reserved arena");
        arena
    }

    /// Fixed arena that commits everything immediately.
    pub fn fixed(capacity: usize) -> Self {
        Self::new(ArenaStrategy::Fixed, capacity)
    }

    /// Growable arena bounded by `reserve` bytes.
    pub fn with_reserve(reserve: usize) -> Self {
        Self::new(ArenaStrategy::Virtual, reserve)
    }

    pub fn strategy(&self) -> ArenaStrategy {
        self.strategy
    }

    /// Bytes handed out since the last reset.
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Bytes currently committed.
    pub fn committed(&self) -> usize {
        self.committed.get()
    }

    /// Reserved ceiling in bytes.
    pub fn capacity(&self) -> usize {
        self.reservation.size()
    }

    /// Carve `layout` out of the arena, committing more pages if needed.
    pub fn try_alloc_layout(&self, layout: Layout) -> ArenaResult<NonNull<u8>> {
        let base_addr = self.base.as_ptr() as usize;
        let cursor = base_addr + self.used.get();
        let start =
            round_up(cursor, layout.align()).ok_or(ArenaError::LayoutOverflow)? - base_addr;
        let end = start
            .checked_add(layout.size())
            .ok_or(ArenaError::LayoutOverflow)?;

        if end > self.capacity() {
            return Err(ArenaError::OutOfReserve {
                requested: end,
                capacity: self.capacity(),
            });
        }
        if end > self.committed.get() {
            self.grow(end);
        }

        self.used.set(end);
        // SAFETY: `start <= end <= capacity`, so the pointer stays inside the reservation.
        Ok(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(start)) })
    }

    /// Like [`try_alloc_layout`](Self::try_alloc_layout), but exhaustion is fatal.
    pub fn alloc_layout(&self, layout: Layout) -> NonNull<u8> {
        match self.try_alloc_layout(layout) {
            Ok(ptr) => ptr,
            Err(err) => {
                tracing::error!(
                    %err,
                    size = layout.size(),
                    align = layout.align(),
                    "arena allocation failed"
                );
                panic!("{err}");
            }
        }
    }

    /// Raw `size`/`align` entry point. `align` must be a power of two.
    pub fn alloc_bytes(&self, size: usize, align: usize) -> NonNull<u8> {
        let layout = match Layout::from_size_align(size, align) {
            Ok(layout) => layout,
            Err(err) => panic!("invalid arena allocation ({size} bytes, align {align}): {err}"),
        };
        self.alloc_layout(layout)
    }

    /// Move `value` into the arena. Its destructor will never run.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T>(&self, value: T) -> &mut T {
        let ptr = self.alloc_layout(Layout::new::<T>()).cast::<T>();
        // SAFETY: freshly carved, aligned for `T`, and disjoint from every other live allocation.
        unsafe {
            ptr.as_ptr().write(value);
            &mut *ptr.as_ptr()
        }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> &mut [T] {
        let dst = self.alloc_uninit_slice::<T>(src.len());
        // SAFETY: `dst` has room for `src.len()` elements and cannot overlap `src`.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), dst.as_mut_ptr().cast::<T>(), src.len());
            std::slice::from_raw_parts_mut(dst.as_mut_ptr().cast::<T>(), src.len())
        }
    }

    /// Fill a slice of exactly `len` elements from `iter`.
    ///
    /// Panics if `iter` yields fewer than `len` items; extra items are ignored.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_fill_iter<T, I>(&self, len: usize, iter: I) -> &mut [T]
    where
        I: IntoIterator<Item = T>,
    {
        let dst = self.alloc_uninit_slice::<T>(len);
        let mut iter = iter.into_iter();
        for (i, slot) in dst.iter_mut().enumerate() {
            match iter.next() {
                Some(value) => {
                    slot.write(value);
                }
                None => panic!("iterator yielded {i} items, arena slice expected {len}"),
            }
        }
        // SAFETY: every element was initialised by the loop above.
        unsafe { std::slice::from_raw_parts_mut(dst.as_mut_ptr().cast::<T>(), len) }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn alloc_str(&self, src: &str) -> &mut str {
        let bytes = self.alloc_slice_copy(src.as_bytes());
        // SAFETY: copied verbatim from a valid `str`.
        unsafe { std::str::from_utf8_unchecked_mut(bytes) }
    }

    #[allow(clippy::mut_from_ref)]
    fn alloc_uninit_slice<T>(&self, len: usize) -> &mut [MaybeUninit<T>] {
        let layout = match Layout::array::<T>(len) {
            Ok(layout) => layout,
            Err(_) => panic!("{}", ArenaError::LayoutOverflow),
        };
        let ptr = self.alloc_layout(layout).cast::<MaybeUninit<T>>();
        // SAFETY: the region is reserved for `len` elements and `MaybeUninit` needs no init.
        unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), len) }
    }

    /// Rewind to the start. Committed pages stay committed.
    pub fn reset(&mut self) {
        tracing::trace!(used = self.used.get(), "arena reset");
        self.used.set(0);
    }

    /// Rewind and give back every committed page.
    ///
    /// The reservation is handed back to the global allocator and replaced by a
    /// fresh, untouched one, so the pages written so far are released. Large
    /// blocks come straight from the OS on the common allocators; a small
    /// reservation may be recycled by the allocator instead. The arena's base
    /// address changes.
    ///
    /// A fixed arena keeps its pages, since it never grows again.
    pub fn decommit(&mut self) {
        self.used.set(0);
        if self.strategy == ArenaStrategy::Fixed || self.committed.get() == 0 {
            return;
        }
        tracing::debug!(committed = self.committed.get(), "arena decommit");
        let fresh = reserve(self.reservation);
        // SAFETY: `base` came from `reserve` with this layout, and `&mut self` proves
        // no allocation carved from it is still borrowed.
        unsafe { alloc::dealloc(self.base.as_ptr(), self.reservation) }
        self.base = fresh;
        self.committed.set(0);
    }

    fn grow(&self, end: usize) {
        profile_function!();
        let committed = self.committed.get();
        debug_assert_eq!(self.strategy, ArenaStrategy::Virtual, "fixed arena never grows");

        let needed = match round_up(end - committed, PAGE_SIZE) {
            Some(needed) => needed,
            None => panic!("{}", ArenaError::LayoutOverflow),
        };
        let target = committed
            .saturating_add(needed.max(committed))
            .min(self.capacity());
        tracing::debug!(from = committed, to = target, "arena commit");
        self.commit_to(target);
    }

    /// Extend the committed range to `target` bytes.
    ///
    /// Virtual arenas only move the mark; the OS backs each page on first write.
    /// Fixed arenas touch their whole range up front.
    fn commit_to(&self, target: usize) {
        let committed = self.committed.get();
        debug_assert!(target <= self.capacity());
        if target <= committed {
            return;
        }
        if self.strategy == ArenaStrategy::Fixed {
            // SAFETY: `[committed, target)` lies inside the reservation and nothing
            // has been handed out from it yet.
            unsafe {
                ptr::write_bytes(self.base.as_ptr().add(committed), 0, target - committed);
            }
        }
        self.committed.set(target);
    }
}

/// Take `layout` from the global allocator without touching it.
fn reserve(layout: Layout) -> NonNull<u8> {
    // SAFETY: arena reservations always have a non-zero size.
    let raw = unsafe { alloc::alloc(layout) };
    match NonNull::new(raw) {
        Some(base) => base,
        None => alloc::handle_alloc_error(layout),
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        tracing::trace!(capacity = self.capacity(), "releasing arena");
        // SAFETY: `base` came from `alloc::alloc` with exactly this layout.
        unsafe { alloc::dealloc(self.base.as_ptr(), self.reservation) }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("strategy", &self.strategy)
            .field("used", &self.used.get())
            .field("committed", &self.committed.get())
            .field("capacity", &self.capacity())
            .finish()
    }
}

fn round_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    value.checked_add(align - 1).map(|v| v & !(align - 1))
}
