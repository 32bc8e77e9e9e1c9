//! Node types of the dock tree.

use std::fmt;

use mosaic_core::alloc::sparse_set::IndexSlot;
use mosaic_core::geometry::{Pos, Rect};
use mosaic_core::id::WidgetId;

/// Handle to a node in a [`Docker`](crate::Docker).
///
/// Handles are generation checked: once a node is freed, its old handle never
/// resolves again, even after the slot is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) IndexSlot);

impl NodeId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0.index(), self.0.generation())
    }
}

/// Axis along which a root lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// No split has been inserted yet.
    #[default]
    None,
    /// Vertical dividers; children run left to right.
    Vertical,
    /// Horizontal dividers; children run top to bottom.
    Horizontal,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Vertical => "vertical",
            Direction::Horizontal => "horizontal",
        }
    }

    pub fn is_split(self) -> bool {
        self != Direction::None
    }

    /// Inclusive bounds of `rect` along the layout axis.
    pub(crate) fn span(self, rect: &Rect) -> (i32, i32) {
        match self {
            Direction::Horizontal => (rect.min_y, rect.max_y),
            _ => (rect.min_x, rect.max_x),
        }
    }

    /// `rect` with its layout-axis bounds replaced.
    pub(crate) fn with_span(self, rect: Rect, start: i32, end: i32) -> Rect {
        match self {
            Direction::Horizontal => Rect::new(rect.min_x, start, rect.max_x, end),
            _ => Rect::new(start, rect.min_y, end, rect.max_y),
        }
    }

    pub(crate) fn axis(self, point: Pos<i32>) -> i32 {
        match self {
            Direction::Horizontal => point.y,
            _ => point.x,
        }
    }
}

/// Which side of the existing node a new sibling goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Side {
    Before,
    #[default]
    After,
}

/// A panel tabbed into a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: WidgetId,
    pub title: String,
}

/// Container whose children alternate between panels and dividers.
#[derive(Debug, Clone, Default)]
pub struct RootNode {
    pub(crate) direction: Direction,
    pub(crate) children: Vec<NodeId>,
}

impl RootNode {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Divider between two siblings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitNode {
    pub(crate) position: f32,
}

impl SplitNode {
    /// Ratio of the parent's extent at which the divider is centred.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Position as an integer permille, as written to layout files.
    pub fn permille(&self) -> u32 {
        (self.position * 1000.0).round() as u32
    }
}

/// Leaf docking target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowNode {
    id: WidgetId,
    name: String,
    tabs: Vec<Tab>,
    active_tab: usize,
}

impl WindowNode {
    pub fn new(id: WidgetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tabs: Vec::new(),
            active_tab: 0,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Add a tab and return its index. The tab identity is derived from the window's.
    pub fn add_tab(&mut self, title: impl Into<String>) -> usize {
        let title = title.into();
        let id = self.id.with(&title);
        self.tabs.push(Tab { id, title });
        self.tabs.len() - 1
    }

    /// Remove a tab at the given index.
    ///
    /// Adjusts `active_tab` to keep a valid selection.
    pub fn remove_tab(&mut self, index: usize) -> Option<Tab> {
        if index >= self.tabs.len() {
            return None;
        }
        let tab = self.tabs.remove(index);

        if self.active_tab >= self.tabs.len() && !self.tabs.is_empty() {
            self.active_tab = self.tabs.len() - 1;
        } else if self.active_tab > index {
            self.active_tab -= 1;
        } else if self.tabs.is_empty() {
            self.active_tab = 0;
        }
        Some(tab)
    }

    /// Set the active tab index.
    /// Returns the previous active tab index if changed.
    pub fn set_active_tab(&mut self, index: usize) -> Option<usize> {
        if index < self.tabs.len() && index != self.active_tab {
            let old_active = self.active_tab;
            self.active_tab = index;
            Some(old_active)
        } else {
            None
        }
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active_tab)
    }

    pub fn active_tab_index(&self) -> usize {
        self.active_tab
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Root(RootNode),
    Split(SplitNode),
    Window(WindowNode),
}

/// Kind tag without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Split,
    Window,
}

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Split => "split",
            NodeType::Window => "window",
        }
    }
}

/// Envelope shared by every node kind.
#[derive(Debug, Clone)]
pub struct DockNode {
    pub(crate) rect: Rect,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl DockNode {
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            rect: Rect::INVALID,
            parent,
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Root(_) => NodeType::Root,
            NodeKind::Split(_) => NodeType::Split,
            NodeKind::Window(_) => NodeType::Window,
        }
    }

    pub fn as_root(&self) -> Option<&RootNode> {
        match &self.kind {
            NodeKind::Root(root) => Some(root),
            _ => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            _ => None,
        }
    }

    pub fn as_window(&self) -> Option<&WindowNode> {
        match &self.kind {
            NodeKind::Window(window) => Some(window),
            _ => None,
        }
    }

    pub(crate) fn as_root_mut(&mut self) -> Option<&mut RootNode> {
        match &mut self.kind {
            NodeKind::Root(root) => Some(root),
            _ => None,
        }
    }

    pub(crate) fn as_window_mut(&mut self) -> Option<&mut WindowNode> {
        match &mut self.kind {
            NodeKind::Window(window) => Some(window),
            _ => None,
        }
    }
}
