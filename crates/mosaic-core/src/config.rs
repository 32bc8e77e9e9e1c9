//! Configuration for the Mosaic memory substrate.

use crate::alloc::arena::ArenaStrategy;

/// Top-level configuration handed to a docking context.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub profiling: ProfilingMode,
    /// Scratch arena that is rewound every frame.
    pub frame_arena: ArenaConfig,
    /// Identity registry sizing.
    pub registry: RegistryConfig,
}

impl Config {
    pub fn profiling(mut self, mode: ProfilingMode) -> Self {
        self.profiling = mode;
        self
    }

    pub fn frame_arena(mut self, arena: ArenaConfig) -> Self {
        self.frame_arena = arena;
        self
    }

    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilingMode {
    /// Profiling scopes are disabled
    #[default]
    Off,
    /// Profiling scopes are recorded and can be viewed using an in-process viewer
    On,
    /// Profiling scopes are recorded and served to external tools such as
    /// 'puffin_viewer' (requires the `profiling` feature)
    WithWebserver,
}

/// Sizing of an [`Arena`](crate::alloc::arena::Arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    pub strategy: ArenaStrategy,
    /// Reserved ceiling in bytes.
    pub capacity: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            strategy: ArenaStrategy::Virtual,
            capacity: 64 * 1024 * 1024,
        }
    }
}

impl ArenaConfig {
    pub fn strategy(mut self, strategy: ArenaStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Sizing of a [`Registry`](crate::alloc::registry::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Bucket count before the first resize.
    pub initial_capacity: usize,
    /// Bucket count each of the two buffers is reserved for.
    pub max_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            max_capacity: 1 << 20,
        }
    }
}

impl RegistryConfig {
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self.max_capacity = self.max_capacity.max(capacity);
        self
    }

    pub fn max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity;
        self
    }
}
