//! Per-frame input and the drag-to-redock state machine.

use mosaic_core::geometry::{Pos, Rect, Size};
use mosaic_core::profiling::profile_function;

use crate::docker::{Detachment, Docker};
use crate::node::{Direction, NodeId, NodeKind, NodeType, Side};

/// Pointer and viewport state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub pointer: Pos<i32>,
    /// Primary button held this frame.
    pub pointer_down: bool,
    /// Primary button held last frame.
    pub pointer_was_down: bool,
    /// New viewport size if the host window was resized.
    pub resized: Option<Size<i32>>,
    /// Abort the current drag (Escape, focus loss).
    pub cancel: bool,
}

impl FrameInput {
    pub fn new(pointer: Pos<i32>) -> Self {
        Self {
            pointer,
            ..Default::default()
        }
    }

    pub fn pointer_down(mut self, down: bool) -> Self {
        self.pointer_down = down;
        self
    }

    pub fn pointer_was_down(mut self, was_down: bool) -> Self {
        self.pointer_was_down = was_down;
        self
    }

    pub fn resized(mut self, size: Size<i32>) -> Self {
        self.resized = Some(size);
        self
    }

    pub fn cancel(mut self) -> Self {
        self.cancel = true;
        self
    }

    /// Button went down this frame.
    pub fn pressed(&self) -> bool {
        self.pointer_down && !self.pointer_was_down
    }

    /// Button went up this frame.
    pub fn released(&self) -> bool {
        !self.pointer_down && self.pointer_was_down
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum Drag {
    #[default]
    Idle,
    /// A detached window follows the pointer.
    Window { node: NodeId, origin: Detachment },
    /// A divider follows the pointer.
    Divider { node: NodeId, original: f32 },
}

impl Docker {
    /// Advance one frame: apply a resize, resolve hover and step the drag state machine.
    pub fn update(&mut self, input: &FrameInput) {
        profile_function!();
        if let Some(size) = input.resized {
            self.resize(size);
        }
        self.pointer = input.pointer;
        self.drop_stale_drag();
        self.hovered = self.node_at(input.pointer);

        match self.drag {
            Drag::Idle => {
                if input.pressed() {
                    self.begin_drag(input.pointer);
                }
            }
            Drag::Window { node, origin } => {
                if input.cancel {
                    self.cancel_window_drag(node, origin);
                } else if !input.pointer_down {
                    self.drop_window(node, origin, input.pointer);
                } else {
                    self.update_preview(input.pointer);
                }
            }
            Drag::Divider { node, original } => {
                if input.cancel {
                    self.drag = Drag::Idle;
                    self.place_divider(node, original);
                    tracing::debug!(%node, original, "divider drag cancelled");
                } else if !input.pointer_down {
                    self.drag = Drag::Idle;
                } else {
                    self.drag_divider(node, input.pointer);
                }
            }
        }

        self.hovered = self.node_at(input.pointer);
        self.debug_validate();
    }

    /// Node being dragged, if any.
    pub fn active_node(&self) -> Option<NodeId> {
        match self.drag {
            Drag::Idle => None,
            Drag::Window { node, .. } | Drag::Divider { node, .. } => Some(node),
        }
    }

    pub fn is_grabbing(&self) -> bool {
        self.drag != Drag::Idle
    }

    pub fn is_dragging_window(&self) -> bool {
        matches!(self.drag, Drag::Window { .. })
    }

    /// Drop-target highlight; invalid unless a window is being dragged over a target.
    pub fn preview(&self) -> Rect {
        self.preview
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn pointer(&self) -> Pos<i32> {
        self.pointer
    }

    /// Where a dragged window would land, and along which axis.
    pub fn drop_target(&self, point: Pos<i32>) -> Option<(NodeId, Direction)> {
        let hit = self.node_at(point)?;
        let target = match &self.get(hit).kind {
            // Dividers are not targets; use the subtree before them.
            NodeKind::Split(_) => {
                let parent = self.get(hit).parent?;
                let index = self.index_in_parent(parent, hit);
                self.first_window(self.root_node(parent).children[index - 1])
            }
            NodeKind::Root(_) => self.first_window(hit),
            NodeKind::Window(_) => hit,
        };
        let rect = self.get(target).rect;
        let to_right = rect.max_x - point.x;
        let to_bottom = rect.max_y - point.y;
        let direction = if to_right <= to_bottom {
            Direction::Vertical
        } else {
            Direction::Horizontal
        };
        Some((target, direction))
    }

    pub(crate) fn title_bar(&self, rect: Rect) -> Rect {
        let bottom = (rect.min_y + self.style.title_bar_height - 1).min(rect.max_y);
        Rect::new(rect.min_x, rect.min_y, rect.max_x, bottom)
    }

    /// Whether `point` lies on the grab strip of `window`.
    pub fn in_title_bar(&self, window: NodeId, point: Pos<i32>) -> bool {
        self.node(window)
            .filter(|node| node.as_window().is_some())
            .is_some_and(|node| self.title_bar(node.rect).contains(point))
    }

    fn begin_drag(&mut self, point: Pos<i32>) {
        let Some(hit) = self.hovered else {
            return;
        };
        match self.get(hit).node_type() {
            NodeType::Window => {
                // A lone window has nowhere else to go.
                if self.get(hit).parent.is_none() || !self.in_title_bar(hit, point) {
                    return;
                }
                let Some(origin) = self.detach_node(hit) else {
                    return;
                };
                self.drag = Drag::Window { node: hit, origin };
                tracing::debug!(window = %hit, "grabbed window");
                self.update_preview(point);
            }
            NodeType::Split => {
                let original = self.position_of(hit);
                self.drag = Drag::Divider {
                    node: hit,
                    original,
                };
                tracing::debug!(divider = %hit, original, "grabbed divider");
            }
            NodeType::Root => {}
        }
    }

    fn update_preview(&mut self, point: Pos<i32>) {
        self.preview = match self.drop_target(point) {
            Some((target, direction)) => half_of(self.get(target).rect, direction),
            None => Rect::INVALID,
        };
    }

    fn drop_window(&mut self, window: NodeId, origin: Detachment, point: Pos<i32>) {
        self.drag = Drag::Idle;
        self.preview = Rect::INVALID;
        if self.is_docked(window) {
            return;
        }
        match self.drop_target(point) {
            Some((target, direction)) if self.check_room(target, direction).is_ok() => {
                self.insert(target, direction, window, Side::After);
                tracing::debug!(%window, %target, ?direction, "dropped window");
            }
            _ => self.dock_beside_root(window, origin.direction),
        }
    }

    /// Put the window back where it was grabbed from.
    fn cancel_window_drag(&mut self, window: NodeId, origin: Detachment) {
        self.drag = Drag::Idle;
        self.preview = Rect::INVALID;
        if self.is_docked(window) {
            return;
        }
        if self.is_docked(origin.anchor)
            && self.check_room(origin.anchor, origin.direction).is_ok()
        {
            // The tree may have changed since the grab; clamp to the current neighbours.
            let split = self.insert(origin.anchor, origin.direction, window, origin.side);
            self.place_divider(split, origin.position);
            tracing::debug!(%window, anchor = %origin.anchor, "window drag cancelled");
        } else {
            self.dock_beside_root(window, origin.direction);
        }
    }

    /// Dock along `direction` beside the whole tree, or across it if that axis is full.
    fn dock_beside_root(&mut self, window: NodeId, direction: Direction) {
        let Some(root) = self.root else {
            self.attach_as_root(window);
            return;
        };
        let direction = if direction.is_split() {
            direction
        } else {
            Direction::Vertical
        };
        let across = match direction {
            Direction::Vertical => Direction::Horizontal,
            _ => Direction::Vertical,
        };
        let direction = if self.check_room(root, direction).is_ok() {
            direction
        } else if self.check_room(root, across).is_ok() {
            across
        } else {
            // The window must land somewhere; it stays collapsed until the viewport grows.
            tracing::warn!(%window, "viewport too small to dock window");
            direction
        };
        self.insert(root, direction, window, Side::After);
        tracing::debug!(%window, ?direction, "docked beside tree root");
    }

    fn drag_divider(&mut self, split: NodeId, point: Pos<i32>) {
        let Some(parent) = self.get(split).parent else {
            return;
        };
        let direction = self.root_node(parent).direction;
        let (lo, hi) = direction.span(&self.get(parent).rect);
        let extent = (hi - lo + 1).max(1);
        let ratio = (direction.axis(point) - lo) as f32 / extent as f32;
        self.place_divider(split, ratio);
    }

    /// Forget a drag whose node was freed through the API.
    fn drop_stale_drag(&mut self) {
        if let Some(node) = self.active_node()
            && self.node(node).is_none()
        {
            tracing::warn!(%node, "dragged node no longer exists");
            self.drag = Drag::Idle;
            self.preview = Rect::INVALID;
        }
    }
}

/// Half of `rect` a window dropped along `direction` would take.
fn half_of(rect: Rect, direction: Direction) -> Rect {
    match direction {
        Direction::Horizontal => {
            Rect::new(rect.min_x, rect.min_y + rect.height() / 2, rect.max_x, rect.max_y)
        }
        _ => Rect::new(rect.min_x + rect.width() / 2, rect.min_y, rect.max_x, rect.max_y),
    }
}

#[cfg(test)]
mod tests {
    use mosaic_core::id::WidgetId;

    use super::*;
    use crate::style::DockStyle;

    fn frame(x: i32, y: i32, down: bool, was_down: bool) -> FrameInput {
        FrameInput::new(Pos::new(x, y))
            .pointer_down(down)
            .pointer_was_down(was_down)
    }

    fn pair() -> (Docker, NodeId, NodeId) {
        let mut docker = Docker::new(DockStyle::default());
        let w0 = docker
            .create_root_window(WidgetId::new("w0"), "W0")
            .unwrap();
        let w1 = docker
            .split_window(w0, Direction::Vertical, WidgetId::new("w1"), "W1")
            .unwrap();
        (docker, w0, w1)
    }

    #[test]
    fn test_edges() {
        assert!(frame(0, 0, true, false).pressed());
        assert!(!frame(0, 0, true, true).pressed());
        assert!(frame(0, 0, false, true).released());
        assert!(!frame(0, 0, false, false).released());
    }

    #[test]
    fn test_press_outside_title_bar_does_nothing() {
        let (mut docker, _, w1) = pair();
        docker.update(&frame(900, 300, true, false));
        assert!(!docker.is_grabbing());
        assert!(docker.is_docked(w1));
    }

    #[test]
    fn test_lone_window_is_not_grabbed() {
        let mut docker = Docker::new(DockStyle::default());
        docker
            .create_root_window(WidgetId::new("w0"), "W0")
            .unwrap();
        docker.update(&frame(100, 5, true, false));
        assert!(!docker.is_grabbing());
    }

    #[test]
    fn test_grab_detaches_and_previews() {
        let (mut docker, w0, w1) = pair();
        docker.update(&frame(900, 5, true, false));
        assert_eq!(docker.active_node(), Some(w1));
        assert!(docker.is_dragging_window());
        assert!(!docker.is_docked(w1));
        assert_eq!(docker.root(), Some(w0));

        docker.update(&frame(1200, 360, true, true));
        assert_eq!(docker.preview(), Rect::new(640, 0, 1279, 719));
        docker.update(&frame(300, 700, true, true));
        assert_eq!(docker.preview(), Rect::new(0, 360, 1279, 719));
    }

    #[test]
    fn test_drop_target_over_divider_uses_previous_sibling() {
        let (docker, w0, _) = pair();
        let (target, _) = docker.drop_target(Pos::new(639, 100)).unwrap();
        assert_eq!(target, w0);
    }

    #[test]
    fn test_divider_drag_and_cancel() {
        let (mut docker, w0, _) = pair();
        let split = docker.root_node(docker.root().unwrap()).children[1];
        docker.update(&frame(639, 300, true, false));
        assert_eq!(docker.active_node(), Some(split));

        docker.update(&frame(320, 300, true, true));
        assert_eq!(docker.position_of(split), 0.25);
        assert_eq!(docker.rect(w0).map(|r| r.max_x), Some(317));

        docker.update(&frame(320, 300, true, true).cancel());
        assert!(!docker.is_grabbing());
        assert_eq!(docker.position_of(split), 0.5);
        assert_eq!(docker.rect(w0).map(|r| r.max_x), Some(637));
    }

    #[test]
    fn test_divider_cancel_clamps_to_new_neighbours() {
        let (mut docker, w0, _) = pair();
        let split = docker.root_node(docker.root().unwrap()).children[1];
        docker.update(&frame(639, 300, true, false));
        docker.update(&frame(1152, 300, true, true));
        assert_eq!(docker.position_of(split), 0.9);

        // The host splits w0 twice while the divider is held.
        let w2 = docker
            .split_window(w0, Direction::Vertical, WidgetId::new("w2"), "W2")
            .unwrap();
        docker
            .split_window(w2, Direction::Vertical, WidgetId::new("w3"), "W3")
            .unwrap();
        let root = docker.root().unwrap();
        let neighbour = docker.root_node(root).children[3];
        assert!(docker.position_of(neighbour) > 0.5);

        docker.update(&frame(1152, 300, true, true).cancel());
        assert!(!docker.is_grabbing());
        let restored = docker.position_of(split);
        assert!((restored - (docker.position_of(neighbour) + 0.02)).abs() < 1e-6);
        docker.validate().unwrap();
    }

    #[test]
    fn test_divider_release_keeps_position() {
        let (mut docker, _, _) = pair();
        let split = docker.root_node(docker.root().unwrap()).children[1];
        docker.update(&frame(639, 300, true, false));
        docker.update(&frame(960, 300, true, true));
        docker.update(&frame(960, 300, false, true));
        assert!(!docker.is_grabbing());
        assert_eq!(docker.position_of(split), 0.75);
    }

    #[test]
    fn test_closing_dragged_window_ends_drag() {
        let (mut docker, _, w1) = pair();
        docker.update(&frame(900, 5, true, false));
        docker.close_window(w1).unwrap();
        docker.update(&frame(900, 5, true, true));
        assert!(!docker.is_grabbing());
        assert_eq!(docker.preview(), Rect::INVALID);
    }
}
