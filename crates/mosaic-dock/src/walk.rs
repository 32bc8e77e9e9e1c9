//! Read-only traversal of the dock tree.

use bitflags::bitflags;
use mosaic_core::alloc::arena::Arena;
use mosaic_core::geometry::Rect;
use mosaic_core::profiling::profile_function;

use crate::docker::Docker;
use crate::drag::Drag;
use crate::node::{DockNode, NodeId, NodeType};

bitflags! {
    /// Interaction state of a drawn node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawFlags: u8 {
        /// Under the pointer.
        const HOVERED = 1 << 0;
        /// Being dragged.
        const ACTIVE  = 1 << 1;
        /// Drop-target highlight rather than a docked node.
        const PREVIEW = 1 << 2;
    }
}

/// One rectangle for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub node: NodeId,
    pub kind: NodeType,
    pub rect: Rect,
    pub flags: DrawFlags,
}

impl DrawItem {
    pub fn hovered(&self) -> bool {
        self.flags.contains(DrawFlags::HOVERED)
    }

    pub fn active(&self) -> bool {
        self.flags.contains(DrawFlags::ACTIVE)
    }

    pub fn is_preview(&self) -> bool {
        self.flags.contains(DrawFlags::PREVIEW)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    docker: &'a Docker,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.docker.children(id).iter().rev().copied());
        Some(id)
    }
}

impl Docker {
    /// Children of a Root in layout order; empty for other nodes.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.node(node).and_then(DockNode::as_root) {
            Some(root) => &root.children,
            None => &[],
        }
    }

    /// Everything below `node`, depth first, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        Descendants {
            docker: self,
            stack: self.children(node).iter().rev().copied().collect(),
        }
    }

    /// The whole docked tree, depth first, starting at the root.
    pub fn walk(&self) -> Descendants<'_> {
        Descendants {
            docker: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Docked windows in layout order.
    pub fn windows(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.walk()
            .filter(|&id| self.get(id).node_type() == NodeType::Window)
    }

    /// Splits and windows to draw this frame, plus the drop preview, carved from `arena`.
    pub fn draw_list<'a>(&self, arena: &'a Arena) -> &'a [DrawItem] {
        profile_function!();
        let preview = self.preview_item();
        let count = self
            .walk()
            .filter(|&id| self.get(id).node_type() != NodeType::Root)
            .count()
            + usize::from(preview.is_some());
        let items = self
            .walk()
            .filter_map(|id| self.draw_item(id))
            .chain(preview);
        arena.alloc_slice_fill_iter(count, items)
    }

    fn draw_item(&self, id: NodeId) -> Option<DrawItem> {
        let node = self.get(id);
        let kind = node.node_type();
        if kind == NodeType::Root {
            return None;
        }
        let mut flags = DrawFlags::empty();
        flags.set(DrawFlags::HOVERED, self.hovered == Some(id));
        flags.set(DrawFlags::ACTIVE, self.active_node() == Some(id));
        Some(DrawItem {
            node: id,
            kind,
            rect: node.rect,
            flags,
        })
    }

    fn preview_item(&self) -> Option<DrawItem> {
        match self.drag {
            Drag::Window { node, .. } if self.preview.is_valid() => Some(DrawItem {
                node,
                kind: NodeType::Window,
                rect: self.preview,
                flags: DrawFlags::ACTIVE | DrawFlags::PREVIEW,
            }),
            _ => None,
        }
    }
}
