//! Cursor affordance derived from the hovered node.

use crate::docker::Docker;
use crate::node::{Direction, NodeKind};

/// Cursor a host should show over the dock tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    /// Over a window's title bar.
    Hand,
    /// Left-right arrows, over a vertical divider.
    ResizeHorizontal,
    /// Up-down arrows, over a horizontal divider.
    ResizeVertical,
}

impl Docker {
    /// Cursor for the current hover, or `None` while something is being dragged.
    pub fn cursor(&self) -> Option<CursorIcon> {
        if self.is_grabbing() {
            return None;
        }
        let Some(node) = self.hovered.and_then(|hovered| self.node(hovered)) else {
            return Some(CursorIcon::Default);
        };
        let icon = match &node.kind {
            NodeKind::Window(_) if self.title_bar(node.rect).contains(self.pointer) => {
                CursorIcon::Hand
            }
            NodeKind::Split(_) => {
                let direction = node
                    .parent
                    .and_then(|parent| self.node(parent))
                    .and_then(|parent| parent.as_root())
                    .map(|root| root.direction);
                match direction {
                    Some(Direction::Horizontal) => CursorIcon::ResizeVertical,
                    _ => CursorIcon::ResizeHorizontal,
                }
            }
            _ => CursorIcon::Default,
        };
        Some(icon)
    }
}
