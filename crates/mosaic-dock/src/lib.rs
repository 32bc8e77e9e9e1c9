//! Mosaic Dock
//!
//! A docking window layout: a tree of Root containers, Split dividers and
//! Window leaves that tiles the viewport, with drag-to-redock, divider
//! resizing and a cursor policy for the host.
//!
//! # Quick start
//!
//! ```
//! use mosaic_core::geometry::Pos;
//! use mosaic_core::id::WidgetId;
//! use mosaic_dock::{Context, Direction, FrameInput};
//!
//! let mut context = Context::default();
//! let docker = context.docker_mut();
//! let scene = docker.create_root_window(WidgetId::new("scene"), "Scene").unwrap();
//! docker
//!     .split_window(scene, Direction::Vertical, WidgetId::new("inspector"), "Inspector")
//!     .unwrap();
//!
//! let frame = context.frame(&FrameInput::new(Pos::new(100, 100)));
//! assert_eq!(frame.draw_list.len(), 3);
//! ```

pub mod context;
pub mod cursor;
pub mod docker;
pub mod drag;
pub mod error;
mod layout;
pub mod layout_writer;
pub mod node;
pub mod style;
pub mod validate;
pub mod walk;

pub use context::{Context, Frame};
pub use cursor::CursorIcon;
pub use docker::{Detachment, Docker};
pub use drag::FrameInput;
pub use error::{DockError, DockResult};
pub use layout_writer::{layout_string, write_layout};
pub use node::{
    Direction, DockNode, NodeId, NodeKind, NodeType, RootNode, Side, SplitNode, Tab, WindowNode,
};
pub use style::DockStyle;
pub use validate::InvariantViolation;
pub use walk::{Descendants, DrawFlags, DrawItem};
