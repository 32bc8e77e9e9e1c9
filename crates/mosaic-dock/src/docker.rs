//! The dock tree and its structural operations.

use std::mem;

use mosaic_core::alloc::registry::Registry;
use mosaic_core::alloc::sparse_set::SparseSet;
use mosaic_core::config::RegistryConfig;
use mosaic_core::geometry::{Pos, Rect};
use mosaic_core::id::WidgetId;
use mosaic_core::profiling::profile_function;

use crate::drag::Drag;
use crate::error::{DockError, DockResult};
use crate::node::{
    Direction, DockNode, NodeId, NodeKind, NodeType, RootNode, Side, SplitNode, WindowNode,
};
use crate::style::DockStyle;

/// Where a window sat before it was detached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detachment {
    /// Sibling the window was next to. Always a Window or Root.
    pub anchor: NodeId,
    /// Side of `anchor` the window occupied.
    pub side: Side,
    pub direction: Direction,
    /// Position of the divider that separated them.
    pub position: f32,
}

/// Owner of a dock tree.
///
/// Nodes live in a generational pool; removed nodes go back to its free list
/// and their handles stop resolving. Windows are also registered by
/// [`WidgetId`] so a host can find the same panel across frames.
pub struct Docker {
    pub(crate) nodes: SparseSet<DockNode>,
    pub(crate) root: Option<NodeId>,
    pub(crate) windows: Registry<NodeId>,
    pub(crate) style: DockStyle,
    pub(crate) viewport: Rect,
    pub(crate) pointer: Pos<i32>,
    pub(crate) hovered: Option<NodeId>,
    pub(crate) drag: Drag,
    pub(crate) preview: Rect,
}

impl Docker {
    pub fn new(style: DockStyle) -> Self {
        Self::with_registry(style, RegistryConfig::default())
    }

    pub fn with_registry(style: DockStyle, registry: RegistryConfig) -> Self {
        Self {
            nodes: SparseSet::new(),
            root: None,
            windows: Registry::new(registry),
            style,
            viewport: Rect::from_origin_size(Pos::default(), style.viewport),
            pointer: Pos::default(),
            hovered: None,
            drag: Drag::Idle,
            preview: Rect::INVALID,
        }
    }

    pub fn style(&self) -> &DockStyle {
        &self.style
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Entry point of the tree, `None` when no window is docked.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Live nodes, including detached windows.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.try_get(id.0)
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.node(id).map(DockNode::rect)
    }

    /// Window registered under `id`.
    pub fn window(&self, id: WidgetId) -> Option<NodeId> {
        self.windows.find(id.as_u64()).copied()
    }

    pub fn window_node(&self, id: NodeId) -> Option<&WindowNode> {
        self.node(id).and_then(DockNode::as_window)
    }

    pub fn window_node_mut(&mut self, id: NodeId) -> Option<&mut WindowNode> {
        self.nodes.try_get_mut(id.0).and_then(DockNode::as_window_mut)
    }

    /// Whether `id` is reachable from the tree root.
    pub fn is_docked(&self, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) => node.parent.is_some() || self.root == Some(id),
            None => false,
        }
    }

    /// Allocate a detached window registered under `id`.
    pub fn create_window(&mut self, id: WidgetId, name: impl Into<String>) -> DockResult<NodeId> {
        if self.windows.contains(id.as_u64()) {
            return Err(DockError::DuplicateWindow(id));
        }
        let node = self.node_alloc(NodeKind::Window(WindowNode::new(id, name)), None);
        self.windows.insert(id.as_u64(), node);
        tracing::debug!(%node, %id, "created window");
        Ok(node)
    }

    /// Create the first window, covering the whole viewport.
    pub fn create_root_window(
        &mut self,
        id: WidgetId,
        name: impl Into<String>,
    ) -> DockResult<NodeId> {
        if self.root.is_some() {
            return Err(DockError::RootExists);
        }
        let window = self.create_window(id, name)?;
        self.attach_as_root(window);
        Ok(window)
    }

    /// Split `target` and put a new window after it.
    pub fn split_window(
        &mut self,
        target: NodeId,
        direction: Direction,
        id: WidgetId,
        name: impl Into<String>,
    ) -> DockResult<NodeId> {
        self.insert_window(target, direction, Side::After, id, name)
    }

    /// Split `target` and put a new window on `side` of it.
    pub fn insert_window(
        &mut self,
        target: NodeId,
        direction: Direction,
        side: Side,
        id: WidgetId,
        name: impl Into<String>,
    ) -> DockResult<NodeId> {
        self.check_split_target(target, direction)?;
        self.check_room(target, direction)?;
        let window = self.create_window(id, name)?;
        self.insert(target, direction, window, side);
        self.debug_validate();
        Ok(window)
    }

    /// Dock a new window beside the whole tree.
    pub fn dock_window(
        &mut self,
        direction: Direction,
        side: Side,
        id: WidgetId,
        name: impl Into<String>,
    ) -> DockResult<NodeId> {
        let root = self.root.ok_or(DockError::NoTree)?;
        self.insert_window(root, direction, side, id, name)
    }

    /// Insert the detached window `new_node` beside `node`.
    ///
    /// Returns the divider that now separates them.
    pub fn split(
        &mut self,
        node: NodeId,
        direction: Direction,
        new_node: NodeId,
        side: Side,
    ) -> DockResult<NodeId> {
        self.check_split_target(node, direction)?;
        self.check_window(new_node)?;
        self.check_room(node, direction)?;
        if self.is_docked(new_node) {
            return Err(DockError::AlreadyDocked(new_node));
        }
        let split = self.insert(node, direction, new_node, side);
        self.debug_validate();
        Ok(split)
    }

    /// Take a window out of the tree without freeing it.
    ///
    /// Returns `None` when the window was the only one docked.
    pub fn detach(&mut self, window: NodeId) -> DockResult<Option<Detachment>> {
        self.check_window(window)?;
        if !self.is_docked(window) {
            return Err(DockError::Detached(window));
        }
        let detachment = self.detach_node(window);
        self.debug_validate();
        Ok(detachment)
    }

    /// Move `window` next to `target`, detaching it first if needed.
    pub fn redock(
        &mut self,
        window: NodeId,
        target: NodeId,
        direction: Direction,
    ) -> DockResult<NodeId> {
        self.check_window(window)?;
        self.check_window(target)?;
        self.check_split_target(target, direction)?;
        if window == target {
            return Err(DockError::AlreadyDocked(window));
        }
        self.check_room(target, direction)?;
        if self.is_docked(window) {
            self.detach_node(window);
        }
        let split = self.insert(target, direction, window, Side::After);
        self.debug_validate();
        Ok(split)
    }

    /// Detach, unregister and free a window. Closing the last window empties the tree.
    pub fn close_window(&mut self, window: NodeId) -> DockResult<WindowNode> {
        self.check_window(window)?;
        if self.is_docked(window) {
            self.detach_node(window);
        }
        let NodeKind::Window(closed) = self.node_free(window).kind else {
            unreachable!("checked to be a window")
        };
        tracing::debug!(%window, name = closed.name(), "closed window");
        self.debug_validate();
        Ok(closed)
    }

    /// Move a divider, clamped between its neighbours. Returns the applied ratio.
    pub fn set_split_position(&mut self, split: NodeId, ratio: f32) -> DockResult<f32> {
        let node = self.node(split).ok_or(DockError::NodeNotFound(split))?;
        if node.as_split().is_none() {
            return Err(DockError::NotASplit(split));
        }
        let applied = self.place_divider(split, ratio);
        self.debug_validate();
        Ok(applied)
    }

    fn check_window(&self, id: NodeId) -> DockResult<()> {
        let node = self.node(id).ok_or(DockError::NodeNotFound(id))?;
        match node.node_type() {
            NodeType::Window => Ok(()),
            _ => Err(DockError::NotAWindow(id)),
        }
    }

    fn check_split_target(&self, target: NodeId, direction: Direction) -> DockResult<()> {
        if !direction.is_split() {
            return Err(DockError::InvalidDirection);
        }
        let node = self.node(target).ok_or(DockError::NodeNotFound(target))?;
        if node.node_type() == NodeType::Split {
            return Err(DockError::NotAWindow(target));
        }
        if !self.is_docked(target) {
            return Err(DockError::Detached(target));
        }
        Ok(())
    }

    /// Whether splitting `target` along `direction` leaves every panel at least a pixel wide.
    pub(crate) fn check_room(&self, target: NodeId, direction: Direction) -> DockResult<()> {
        let node = self.get(target);
        let (lo, hi) = direction.span(&node.rect);
        let needed = self.min_extent(target, direction) + 2 * self.style.split_half_size + 1;
        if hi - lo + 1 < needed {
            return Err(DockError::NoRoom(target));
        }
        if let Some(parent) = node.parent
            && self.root_node(parent).direction == direction
        {
            let index = self.index_in_parent(parent, target);
            let (before, after) = self.bounds(parent, index, 1);
            let position = (before + after) * 0.5;
            if position <= before || position >= after {
                return Err(DockError::NoRoom(target));
            }
        }
        Ok(())
    }

    pub(crate) fn attach_as_root(&mut self, node: NodeId) {
        debug_assert!(self.root.is_none());
        self.root = Some(node);
        let viewport = self.viewport;
        let entry = self.get_mut(node);
        entry.parent = None;
        entry.rect = viewport;
        self.layout_subtree(node);
        tracing::debug!(%node, "attached as tree root");
    }

    /// Insert `new_node` next to `node`. Both must have been checked by the caller.
    pub(crate) fn insert(
        &mut self,
        node: NodeId,
        direction: Direction,
        new_node: NodeId,
        side: Side,
    ) -> NodeId {
        profile_function!();
        let parent = match self.get(node).parent {
            Some(parent) => parent,
            None => self.wrap_in_root(node),
        };
        let parent = match self.root_node(parent).direction {
            Direction::None => {
                self.root_node_mut(parent).direction = direction;
                parent
            }
            current if current == direction => parent,
            _ => self.nest(node, direction),
        };

        let index = self.index_in_parent(parent, node);
        let (before, after) = self.bounds(parent, index, 1);
        let position = (before + after) * 0.5;
        let split = self.node_alloc(NodeKind::Split(SplitNode { position }), Some(parent));
        self.get_mut(new_node).parent = Some(parent);

        let children = &mut self.root_node_mut(parent).children;
        match side {
            Side::After => {
                children.insert(index + 1, split);
                children.insert(index + 2, new_node);
            }
            Side::Before => {
                children.insert(index, split);
                children.insert(index, new_node);
            }
        }
        tracing::debug!(%node, %new_node, %parent, ?direction, ?side, position, "split");

        // Ancestors may need to make room for the new panel.
        self.recalculate();
        split
    }

    /// Make the bare tree root the sole child of a fresh Root.
    fn wrap_in_root(&mut self, node: NodeId) -> NodeId {
        debug_assert_eq!(self.root, Some(node), "only the tree root lacks a parent");
        let rect = self.get(node).rect;
        let root = self.node_alloc(
            NodeKind::Root(RootNode {
                direction: Direction::None,
                children: vec![node],
            }),
            None,
        );
        self.get_mut(root).rect = rect;
        self.get_mut(node).parent = Some(root);
        self.root = Some(root);
        tracing::debug!(%node, %root, "wrapped tree root");
        root
    }

    /// Replace `node` in its parent by a Root with `direction` that owns only `node`.
    fn nest(&mut self, node: NodeId, direction: Direction) -> NodeId {
        let Some(parent) = self.get(node).parent else {
            panic!("cannot nest {node}: it has no parent");
        };
        let index = self.index_in_parent(parent, node);
        let rect = self.get(node).rect;
        let nested = self.node_alloc(
            NodeKind::Root(RootNode {
                direction,
                children: vec![node],
            }),
            Some(parent),
        );
        self.get_mut(nested).rect = rect;
        self.root_node_mut(parent).children[index] = nested;
        self.get_mut(node).parent = Some(nested);
        tracing::debug!(%node, %nested, ?direction, "nested root");
        nested
    }

    /// Unlink a docked window together with its adjacent divider.
    pub(crate) fn detach_node(&mut self, window: NodeId) -> Option<Detachment> {
        profile_function!();
        let Some(parent) = self.get(window).parent else {
            debug_assert_eq!(self.root, Some(window));
            self.root = None;
            tracing::debug!(%window, "detached last window");
            return None;
        };

        let index = self.index_in_parent(parent, window);
        let root = self.root_node(parent);
        assert!(
            root.children.len() >= 3,
            "root {parent} has {} children",
            root.children.len()
        );
        let direction = root.direction;
        // Take the divider on whichever side keeps a neighbour to anchor to.
        let (split_index, anchor, side) = if index == 0 {
            (1, root.children[2], Side::Before)
        } else {
            (index - 1, root.children[index - 2], Side::After)
        };
        let split = root.children[split_index];
        let position = self.position_of(split);

        let first = split_index.min(index);
        self.root_node_mut(parent).children.drain(first..first + 2);
        self.get_mut(window).parent = None;
        self.node_free(split);
        tracing::debug!(%window, %parent, %split, "detached window");

        if self.root_node(parent).children.len() == 1 {
            self.collapse(parent);
        }
        self.recalculate();

        Some(Detachment {
            anchor,
            side,
            direction,
            position,
        })
    }

    /// Replace a Root left with one child by that child.
    fn collapse(&mut self, root: NodeId) {
        let Some(only) = self.root_node_mut(root).children.pop() else {
            panic!("collapsing empty root {root}");
        };
        let (rect, parent) = {
            let node = self.get(root);
            (node.rect, node.parent)
        };
        match parent {
            Some(grand) => {
                let index = self.index_in_parent(grand, root);
                self.root_node_mut(grand).children[index] = only;
            }
            None => self.root = Some(only),
        }
        let promoted = self.get_mut(only);
        promoted.parent = parent;
        promoted.rect = rect;
        self.node_free(root);
        tracing::debug!(%root, %only, "collapsed root");
    }

    pub(crate) fn node_alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        NodeId(self.nodes.push(DockNode::new(kind, parent)))
    }

    /// Recycle a node. Roots take their whole subtree with them.
    pub(crate) fn node_free(&mut self, id: NodeId) -> DockNode {
        let mut node = self.nodes.remove(id.0);
        match &mut node.kind {
            NodeKind::Root(root) => {
                for child in mem::take(&mut root.children) {
                    self.node_free(child);
                }
            }
            NodeKind::Window(window) => {
                let key = window.id().as_u64();
                if self.windows.find(key) == Some(&id) {
                    self.windows.remove(key);
                }
            }
            NodeKind::Split(_) => {}
        }
        node
    }

    pub(crate) fn get(&self, id: NodeId) -> &DockNode {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut DockNode {
        self.nodes.get_mut(id.0)
    }

    pub(crate) fn root_node(&self, id: NodeId) -> &RootNode {
        match self.get(id).as_root() {
            Some(root) => root,
            None => panic!("expected {id} to be a root"),
        }
    }

    fn root_node_mut(&mut self, id: NodeId) -> &mut RootNode {
        match self.get_mut(id).as_root_mut() {
            Some(root) => root,
            None => panic!("expected {id} to be a root"),
        }
    }

    pub(crate) fn position_of(&self, split: NodeId) -> f32 {
        match self.get(split).as_split() {
            Some(split) => split.position,
            None => panic!("expected {split} to be a split"),
        }
    }

    pub(crate) fn set_position(&mut self, split: NodeId, position: f32) {
        match &mut self.get_mut(split).kind {
            NodeKind::Split(node) => node.position = position,
            _ => panic!("expected {split} to be a split"),
        }
    }

    pub(crate) fn index_in_parent(&self, parent: NodeId, child: NodeId) -> usize {
        match self.root_node(parent).children.iter().position(|&c| c == child) {
            Some(index) => index,
            None => panic!("{child} is not a child of {parent}"),
        }
    }

    /// Positions of the dividers `distance` slots around `index`, or the parent's edges.
    pub(crate) fn bounds(&self, parent: NodeId, index: usize, distance: usize) -> (f32, f32) {
        let children = &self.root_node(parent).children;
        let before = index
            .checked_sub(distance)
            .map_or(0.0, |i| self.position_of(children[i]));
        let after = children
            .get(index + distance)
            .map_or(1.0, |&split| self.position_of(split));
        (before, after)
    }

    pub(crate) fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        if let Err(violation) = self.validate() {
            panic!("dock tree invariant violated: {violation}");
        }
    }
}

impl std::fmt::Debug for Docker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Docker")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("windows", &self.windows.len())
            .field("viewport", &self.viewport)
            .field("drag", &self.drag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use mosaic_core::geometry::Size;

    use super::*;

    fn docker() -> Docker {
        Docker::new(DockStyle::default())
    }

    fn id(name: &str) -> WidgetId {
        WidgetId::new(name)
    }

    #[test]
    fn test_root_window_covers_viewport() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        assert_eq!(docker.root(), Some(w0));
        assert_eq!(docker.rect(w0), Some(Rect::new(0, 0, 1279, 719)));
        assert_eq!(docker.window(id("w0")), Some(w0));
        assert_eq!(
            docker.create_root_window(id("w1"), "W1"),
            Err(DockError::RootExists)
        );
    }

    #[test]
    fn test_split_builds_alternating_children() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let w1 = docker
            .split_window(w0, Direction::Vertical, id("w1"), "W1")
            .unwrap();

        let root = docker.root().unwrap();
        let children = docker.root_node(root).children.clone();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], w0);
        assert_eq!(children[2], w1);
        assert_eq!(docker.position_of(children[1]), 0.5);
        assert_eq!(docker.root_node(root).direction, Direction::Vertical);
    }

    #[test]
    fn test_bisects_span_of_target() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let w1 = docker
            .split_window(w0, Direction::Vertical, id("w1"), "W1")
            .unwrap();
        docker
            .split_window(w1, Direction::Vertical, id("w2"), "W2")
            .unwrap();
        docker
            .insert_window(w0, Direction::Vertical, Side::Before, id("w3"), "W3")
            .unwrap();

        let root = docker.root().unwrap();
        let positions: Vec<f32> = docker
            .root_node(root)
            .children
            .iter()
            .filter_map(|&c| docker.get(c).as_split().map(|s| s.position))
            .collect();
        assert_eq!(positions, vec![0.25, 0.5, 0.75]);
        let first = docker.root_node(root).children[0];
        assert_eq!(docker.window_node(first).map(|w| w.name()), Some("W3"));
    }

    #[test]
    fn test_cross_axis_split_nests_root() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        docker
            .split_window(w0, Direction::Vertical, id("w1"), "W1")
            .unwrap();
        let w2 = docker
            .split_window(w0, Direction::Horizontal, id("w2"), "W2")
            .unwrap();

        let nested = docker.get(w0).parent.unwrap();
        assert_ne!(Some(nested), docker.root());
        assert_eq!(docker.root_node(nested).direction, Direction::Horizontal);
        assert_eq!(docker.root_node(nested).children.len(), 3);
        assert_eq!(docker.get(w2).parent, Some(nested));
        assert_eq!(docker.get(nested).parent, docker.root());
        docker.validate().unwrap();
    }

    #[test]
    fn test_duplicate_window_rejected() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let before = docker.len();
        assert_eq!(
            docker.split_window(w0, Direction::Vertical, id("w0"), "again"),
            Err(DockError::DuplicateWindow(id("w0")))
        );
        assert_eq!(docker.len(), before);
    }

    #[test]
    fn test_split_rejects_bad_arguments() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let w1 = docker
            .split_window(w0, Direction::Vertical, id("w1"), "W1")
            .unwrap();
        let divider = docker.root_node(docker.root().unwrap()).children[1];

        assert_eq!(
            docker.split_window(w0, Direction::None, id("x"), "X"),
            Err(DockError::InvalidDirection)
        );
        assert_eq!(
            docker.split_window(divider, Direction::Vertical, id("x"), "X"),
            Err(DockError::NotAWindow(divider))
        );
        assert_eq!(
            docker.split(w0, Direction::Vertical, w1, Side::After),
            Err(DockError::AlreadyDocked(w1))
        );
    }

    #[test]
    fn test_detach_collapses_to_sibling() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let w1 = docker
            .split_window(w0, Direction::Vertical, id("w1"), "W1")
            .unwrap();
        let old_root = docker.root().unwrap();

        let detachment = docker.detach(w1).unwrap().unwrap();
        assert_eq!(detachment.anchor, w0);
        assert_eq!(detachment.side, Side::After);
        assert_eq!(detachment.direction, Direction::Vertical);
        assert_eq!(docker.root(), Some(w0));
        assert_eq!(docker.get(w0).parent, None);
        assert_eq!(docker.rect(w0), Some(docker.viewport()));
        assert!(docker.node(old_root).is_none());
        assert!(!docker.is_docked(w1));
        // w0, w1
        assert_eq!(docker.len(), 2);
    }

    #[test]
    fn test_detach_first_child_anchors_before() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let w1 = docker
            .split_window(w0, Direction::Horizontal, id("w1"), "W1")
            .unwrap();
        let w2 = docker
            .split_window(w1, Direction::Horizontal, id("w2"), "W2")
            .unwrap();

        let detachment = docker.detach(w0).unwrap().unwrap();
        assert_eq!(detachment.anchor, w1);
        assert_eq!(detachment.side, Side::Before);
        let root = docker.root().unwrap();
        assert_eq!(docker.root_node(root).children.len(), 3);
        assert_eq!(docker.root_node(root).children[0], w1);
        assert_eq!(docker.root_node(root).children[2], w2);
    }

    #[test]
    fn test_close_last_window_empties_tree() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let closed = docker.close_window(w0).unwrap();
        assert_eq!(closed.name(), "W0");
        assert!(docker.is_empty());
        assert_eq!(docker.len(), 0);
        assert_eq!(docker.window(id("w0")), None);
        assert_eq!(docker.close_window(w0), Err(DockError::NodeNotFound(w0)));
    }

    #[test]
    fn test_split_until_no_room() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let mut splits = 0;
        let refused = loop {
            let name = format!("w{}", splits + 1);
            match docker.split_window(w0, Direction::Vertical, id(&name), name.clone()) {
                Ok(_) => splits += 1,
                Err(err) => break err,
            }
            assert!(splits < 16, "splitting never ran out of room");
        };
        assert_eq!(refused, DockError::NoRoom(w0));
        assert!(docker.window(id(&format!("w{}", splits + 1))).is_none());
        assert_eq!(docker.window_count(), splits + 1);
        docker.validate().unwrap();
        for window in docker.windows() {
            let rect = docker.rect(window).unwrap();
            assert!(rect.width() >= 1, "{window} collapsed: {rect:?}");
        }
    }

    #[test]
    fn test_narrow_viewport_refuses_split() {
        let mut docker = Docker::new(DockStyle::default().viewport(Size::new(5, 40)));
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let w1 = docker.create_window(id("w1"), "W1").unwrap();
        assert_eq!(
            docker.split(w0, Direction::Vertical, w1, Side::After),
            Err(DockError::NoRoom(w0))
        );
        assert!(!docker.is_docked(w1));
        docker
            .split(w0, Direction::Horizontal, w1, Side::After)
            .unwrap();
        assert_eq!(
            docker.redock(w1, w0, Direction::Vertical),
            Err(DockError::NoRoom(w0))
        );
        assert!(docker.is_docked(w1));
        docker.validate().unwrap();
    }

    #[test]
    fn test_freed_slots_are_recycled() {
        let mut docker = docker();
        let w0 = docker.create_root_window(id("w0"), "W0").unwrap();
        let w1 = docker
            .split_window(w0, Direction::Vertical, id("w1"), "W1")
            .unwrap();
        docker.close_window(w1).unwrap();
        // window, divider and the collapsed root
        assert_eq!(docker.nodes.free_count(), 3);

        let w2 = docker
            .split_window(w0, Direction::Vertical, id("w2"), "W2")
            .unwrap();
        assert_eq!(docker.nodes.free_count(), 0);
        assert_eq!(w2.index(), w1.index());
        assert_ne!(w2.generation(), w1.generation());
        assert!(docker.node(w1).is_none());
        assert!(docker.node(w2).is_some());
    }
}
