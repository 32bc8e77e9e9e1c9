//! Structural checks over the whole tree.

use std::fmt;

use crate::docker::Docker;
use crate::node::{Direction, NodeId, NodeKind};

/// A broken tree invariant. Any of these is a bug in the dock code.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// A child handle that no longer resolves.
    StaleHandle(NodeId),
    EmptyRoot(NodeId),
    SingletonRoot(NodeId),
    /// Root with several children but no direction.
    UndirectedRoot(NodeId),
    /// Children do not alternate panel, divider, panel.
    Alternation { root: NodeId, index: usize },
    RatioOutOfRange { split: NodeId, position: f32 },
    /// Divider not strictly after the previous divider of the same root.
    RatioOrder { split: NodeId, position: f32, previous: f32 },
    ParentMismatch {
        node: NodeId,
        expected: Option<NodeId>,
        found: Option<NodeId>,
    },
    /// Window not registered under its own identity.
    Unregistered(NodeId),
    /// Live nodes that are neither docked nor free-floating windows.
    Unreachable { live: usize, reachable: usize },
    /// Child rectangles do not tile their root edge to edge.
    Gap { root: NodeId, index: usize },
    /// A window has no area although the viewport can fit every panel.
    Collapsed(NodeId),
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle(id) => write!(f, "child {id} does not resolve"),
            Self::EmptyRoot(id) => write!(f, "root {id} has no children"),
            Self::SingletonRoot(id) => write!(f, "root {id} has a single child"),
            Self::UndirectedRoot(id) => write!(f, "root {id} has children but no direction"),
            Self::Alternation { root, index } => {
                write!(f, "root {root} breaks alternation at child {index}")
            }
            Self::RatioOutOfRange { split, position } => {
                write!(f, "split {split} at {position} is outside [0, 1]")
            }
            Self::RatioOrder {
                split,
                position,
                previous,
            } => write!(
                f,
                "split {split} at {position} does not follow its neighbour at {previous}"
            ),
            Self::ParentMismatch {
                node,
                expected,
                found,
            } => write!(f, "node {node} has parent {found:?}, expected {expected:?}"),
            Self::Unregistered(id) => write!(f, "window {id} is missing from the registry"),
            Self::Unreachable { live, reachable } => {
                write!(f, "{live} live nodes but only {reachable} accounted for")
            }
            Self::Gap { root, index } => {
                write!(f, "child {index} of root {root} does not meet its neighbours")
            }
            Self::Collapsed(id) => write!(f, "window {id} has an empty rectangle"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

impl Docker {
    /// Check every structural invariant of the tree.
    ///
    /// Detached windows are allowed to float outside the tree; every other
    /// live node must be reachable from the root.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let floating = self
            .nodes
            .iter_slots()
            .filter(|(slot, node)| {
                node.as_window().is_some()
                    && node.parent.is_none()
                    && self.root.map(|root| root.0) != Some(*slot)
            })
            .count();

        let mut reachable = 0;
        if let Some(root) = self.root {
            let node = self
                .node(root)
                .ok_or(InvariantViolation::StaleHandle(root))?;
            if node.parent.is_some() {
                return Err(InvariantViolation::ParentMismatch {
                    node: root,
                    expected: None,
                    found: node.parent,
                });
            }
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                reachable += 1;
                self.check_node(id)?;
                stack.extend_from_slice(self.children(id));
            }
            self.check_window_area(root)?;
        }

        let live = self.nodes.len();
        if live != reachable + floating {
            return Err(InvariantViolation::Unreachable {
                live,
                reachable: reachable + floating,
            });
        }
        Ok(())
    }

    fn check_node(&self, id: NodeId) -> Result<(), InvariantViolation> {
        let node = self.node(id).ok_or(InvariantViolation::StaleHandle(id))?;
        let root = match &node.kind {
            NodeKind::Root(root) => root,
            NodeKind::Window(window) => {
                return match self.window(window.id()) {
                    Some(registered) if registered == id => Ok(()),
                    _ => Err(InvariantViolation::Unregistered(id)),
                };
            }
            NodeKind::Split(_) => return Ok(()),
        };

        match root.children.len() {
            0 => return Err(InvariantViolation::EmptyRoot(id)),
            1 => return Err(InvariantViolation::SingletonRoot(id)),
            len if len % 2 == 0 => {
                return Err(InvariantViolation::Alternation {
                    root: id,
                    index: len - 1,
                });
            }
            _ => {}
        }
        if root.direction == Direction::None {
            return Err(InvariantViolation::UndirectedRoot(id));
        }

        let mut previous = 0.0;
        for (index, &child_id) in root.children.iter().enumerate() {
            let child = self
                .node(child_id)
                .ok_or(InvariantViolation::StaleHandle(child_id))?;
            if child.parent != Some(id) {
                return Err(InvariantViolation::ParentMismatch {
                    node: child_id,
                    expected: Some(id),
                    found: child.parent,
                });
            }
            match (&child.kind, index % 2) {
                (NodeKind::Split(split), 1) => {
                    let position = split.position;
                    if !(0.0..=1.0).contains(&position) {
                        return Err(InvariantViolation::RatioOutOfRange {
                            split: child_id,
                            position,
                        });
                    }
                    if index > 1 && position <= previous {
                        return Err(InvariantViolation::RatioOrder {
                            split: child_id,
                            position,
                            previous,
                        });
                    }
                    previous = position;
                }
                (NodeKind::Split(_), _) | (_, 1) => {
                    return Err(InvariantViolation::Alternation { root: id, index });
                }
                _ => {}
            }
        }
        self.check_tiling(id)
    }

    /// Children sit edge to edge along the root's axis and span it fully across.
    fn check_tiling(&self, id: NodeId) -> Result<(), InvariantViolation> {
        let rect = self.get(id).rect;
        let root = self.root_node(id);
        let direction = root.direction;
        let across = match direction {
            Direction::Horizontal => Direction::Vertical,
            _ => Direction::Horizontal,
        };
        let (lo, hi) = direction.span(&rect);
        let mut next = lo;
        for (index, &child) in root.children.iter().enumerate() {
            let child_rect = self.get(child).rect;
            let (start, end) = direction.span(&child_rect);
            if start != next || across.span(&child_rect) != across.span(&rect) {
                return Err(InvariantViolation::Gap { root: id, index });
            }
            next = end + 1;
        }
        if next != hi + 1 {
            return Err(InvariantViolation::Gap {
                root: id,
                index: root.children.len() - 1,
            });
        }
        Ok(())
    }

    /// Every docked window has area whenever the viewport is large enough for all of them.
    fn check_window_area(&self, root: NodeId) -> Result<(), InvariantViolation> {
        let fits = self.viewport.width() >= self.min_extent(root, Direction::Vertical)
            && self.viewport.height() >= self.min_extent(root, Direction::Horizontal);
        if !fits {
            return Ok(());
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.as_window().is_some() && (node.rect.width() < 1 || node.rect.height() < 1) {
                return Err(InvariantViolation::Collapsed(id));
            }
            stack.extend_from_slice(self.children(id));
        }
        Ok(())
    }
}
