use mosaic_core::id::WidgetId;

use crate::node::NodeId;

/// Errors returned by docking operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    /// Node handle is stale or was never allocated.
    NodeNotFound(NodeId),
    /// Operation needs a Window node.
    NotAWindow(NodeId),
    /// Operation needs a Split node.
    NotASplit(NodeId),
    /// The tree already has a root.
    RootExists,
    /// Another window is registered under this identity.
    DuplicateWindow(WidgetId),
    /// The tree is empty.
    NoTree,
    /// Node is not part of the tree.
    Detached(NodeId),
    /// Node is already part of the tree.
    AlreadyDocked(NodeId),
    /// Splitting needs a vertical or horizontal direction.
    InvalidDirection,
    /// Node is too small along the split axis to take another window.
    NoRoom(NodeId),
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DockError::NodeNotFound(id) => write!(f, "Node {} not found", id),
            DockError::NotAWindow(id) => write!(f, "Node {} is not a window", id),
            DockError::NotASplit(id) => write!(f, "Node {} is not a split", id),
            DockError::RootExists => write!(f, "Dock tree already has a root"),
            DockError::DuplicateWindow(id) => write!(f, "A window with {} already exists", id),
            DockError::NoTree => write!(f, "Dock tree is empty"),
            DockError::Detached(id) => write!(f, "Node {} is not docked", id),
            DockError::AlreadyDocked(id) => write!(f, "Node {} is already docked", id),
            DockError::InvalidDirection => {
                write!(f, "Split direction must be vertical or horizontal")
            }
            DockError::NoRoom(id) => write!(f, "Node {} has no room for another split", id),
        }
    }
}

impl std::error::Error for DockError {}

/// Result type for dock operations.
pub type DockResult<T> = Result<T, DockError>;
