//! Mosaic Core
//!
//! Memory substrate for the Mosaic docking engine: a page-granular bump
//! [`Arena`](alloc::arena::Arena), the double-buffered identity
//! [`Registry`](alloc::registry::Registry), and the generational
//! [`SparseSet`](alloc::sparse_set::SparseSet) used as a node pool.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod id;
pub mod logging;
pub mod profiling;
