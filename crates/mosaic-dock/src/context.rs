//! Per-frame entry point tying the dock tree to its scratch memory.

use mosaic_core::alloc::arena::Arena;
use mosaic_core::config::Config;
use mosaic_core::profiling::{self, profile_function};

use crate::cursor::CursorIcon;
use crate::docker::Docker;
use crate::drag::FrameInput;
use crate::style::DockStyle;
use crate::walk::DrawItem;

/// Owns the dock tree and the arena that frame output is carved from.
///
/// Hosts keep one of these instead of any process-wide state.
pub struct Context {
    frame_arena: Arena,
    docker: Docker,
}

/// Output of [`Context::frame`], valid until the next frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// `None` while a drag is in progress.
    pub cursor: Option<CursorIcon>,
    pub draw_list: &'a [DrawItem],
}

impl Context {
    pub fn new(config: Config, style: DockStyle) -> Self {
        profiling::apply_mode(config.profiling);
        let frame_arena = Arena::new(config.frame_arena.strategy, config.frame_arena.capacity);
        let docker = Docker::with_registry(style, config.registry);
        tracing::debug!(?config, "dock context created");
        Self {
            frame_arena,
            docker,
        }
    }

    pub fn docker(&self) -> &Docker {
        &self.docker
    }

    pub fn docker_mut(&mut self) -> &mut Docker {
        &mut self.docker
    }

    pub fn frame_arena(&self) -> &Arena {
        &self.frame_arena
    }

    /// Rewind the frame arena, run the update pass and collect what to draw.
    pub fn frame(&mut self, input: &FrameInput) -> Frame<'_> {
        profiling::new_frame();
        profile_function!();
        self.frame_arena.reset();
        self.docker.update(input);
        Frame {
            cursor: self.docker.cursor(),
            draw_list: self.docker.draw_list(&self.frame_arena),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default(), DockStyle::default())
    }
}
