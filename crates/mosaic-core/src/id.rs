//! Stable identities for state that persists across frames.

use std::fmt;
use std::panic::Location;

use crate::alloc::registry::TOMBSTONE;

/// A stable 64-bit identity used as a [`Registry`](crate::alloc::registry::Registry) key.
///
/// Built from a string key or from a source location, so the same call site
/// produces the same id every frame. Never equal to a registry sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Create a widget ID from a string key.
    pub fn new(key: &str) -> Self {
        Self::from_hash(fnv1a(FNV_OFFSET_BASIS, key.as_bytes()))
    }

    /// Identity of the caller's source location.
    #[track_caller]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        let mut hash = fnv1a(FNV_OFFSET_BASIS, location.file().as_bytes());
        hash = fnv1a(hash, &location.line().to_le_bytes());
        hash = fnv1a(hash, &location.column().to_le_bytes());
        Self::from_hash(hash)
    }

    /// Derive a child identity, e.g. for the n-th tab of a window.
    pub fn with(self, key: &str) -> Self {
        Self::from_hash(fnv1a(self.0, key.as_bytes()))
    }

    /// Wrap a raw hash. Values that collide with a registry sentinel are folded down.
    pub const fn from_hash(hash: u64) -> Self {
        if hash >= TOMBSTONE {
            Self(hash - 2)
        } else {
            Self(hash)
        }
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId(0x{:016x})", self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WidgetId {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
