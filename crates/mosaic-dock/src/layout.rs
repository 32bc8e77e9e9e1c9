//! Rectangle computation and hit testing.

use mosaic_core::geometry::{Pos, Rect, Size};
use mosaic_core::profiling::{profile_function, profile_scope};

use crate::docker::Docker;
use crate::node::{Direction, NodeId, NodeKind};

impl Docker {
    /// Adopt a new viewport size and lay the tree out again.
    pub fn resize(&mut self, size: Size<i32>) {
        self.viewport = Rect::from_origin_size(Pos::default(), size);
        tracing::trace!(width = size.width, height = size.height, "dock viewport resized");
        self.recalculate();
    }

    /// Recompute every rectangle top-down from the viewport.
    ///
    /// Only reads split positions, so running it twice yields the same rectangles.
    pub fn recalculate(&mut self) {
        profile_function!();
        if let Some(root) = self.root {
            self.get_mut(root).rect = self.viewport;
            self.layout_subtree(root);
        }
    }

    pub(crate) fn layout_subtree(&mut self, node: NodeId) {
        let Some(root) = self.get(node).as_root() else {
            return;
        };
        let children = root.children.clone();
        let rects = self.child_rects(node);
        for (child, rect) in children.into_iter().zip(rects) {
            self.get_mut(child).rect = rect;
            self.layout_subtree(child);
        }
    }

    /// Rectangles of every child of `parent`, clipped by the divider bands.
    fn child_rects(&self, parent: NodeId) -> Vec<Rect> {
        let rect = self.get(parent).rect;
        let root = self.root_node(parent);
        let direction = root.direction;
        let count = root.children.len();
        if direction == Direction::None {
            return vec![rect; count];
        }

        let (lo, hi) = direction.span(&rect);
        let half = self.style.split_half_size;
        let centers = self.divider_centers(parent);
        (0..count)
            .map(|index| {
                let (start, end) = if index % 2 == 1 {
                    let center = centers[index / 2];
                    (center - half, center + half - 1)
                } else {
                    let start = match index {
                        0 => lo,
                        _ => centers[index / 2 - 1] + half,
                    };
                    let end = match centers.get(index / 2) {
                        Some(&center) => center - half - 1,
                        None => hi,
                    };
                    (start, end)
                };
                direction.with_span(rect, start, end)
            })
            .collect()
    }

    /// Pixel centre of each divider of `parent`.
    ///
    /// Starts from `round(position * extent)`, then pushes centres apart so
    /// every panel keeps its [`min_extent`](Self::min_extent). When the parent
    /// is too small for that, the far edge wins and the first panels shrink.
    fn divider_centers(&self, parent: NodeId) -> Vec<i32> {
        let root = self.root_node(parent);
        let direction = root.direction;
        let (lo, hi) = direction.span(&self.get(parent).rect);
        let extent = (hi - lo + 1) as f32;
        let half = self.style.split_half_size;
        let mins: Vec<i32> = root
            .children
            .iter()
            .step_by(2)
            .map(|&child| self.min_extent(child, direction))
            .collect();
        let mut centers: Vec<i32> = root
            .children
            .iter()
            .skip(1)
            .step_by(2)
            .map(|&split| lo + (self.position_of(split) * extent).round() as i32)
            .collect();

        let mut floor = lo + half + mins[0];
        for (index, center) in centers.iter_mut().enumerate() {
            *center = (*center).max(floor);
            floor = *center + 2 * half + mins[index + 1];
        }
        let mut ceiling = hi + 1 - half - mins[mins.len() - 1];
        for (index, center) in centers.iter_mut().enumerate().rev() {
            *center = (*center).min(ceiling);
            ceiling = *center - 2 * half - mins[index];
        }
        centers
    }

    /// Fewest pixels `node` needs along `axis` so no window inside it collapses.
    pub(crate) fn min_extent(&self, node: NodeId, axis: Direction) -> i32 {
        match &self.get(node).kind {
            NodeKind::Window(_) => 1,
            NodeKind::Split(_) => 2 * self.style.split_half_size,
            NodeKind::Root(root) if root.direction == axis => root
                .children
                .iter()
                .map(|&child| self.min_extent(child, axis))
                .sum(),
            NodeKind::Root(root) => root
                .children
                .iter()
                .step_by(2)
                .map(|&child| self.min_extent(child, axis))
                .max()
                .unwrap_or(1),
        }
    }

    /// Deepest Split or Window under the pointer.
    pub fn node_at(&self, point: Pos<i32>) -> Option<NodeId> {
        profile_function!();
        self.root
            .and_then(|root| self.get_node_in_position(root, point.x, point.y))
    }

    /// Search the subtree of `node` for the first Split or Window containing `(x, y)`.
    ///
    /// Roots are only descended into, never returned.
    pub fn get_node_in_position(&self, node: NodeId, x: i32, y: i32) -> Option<NodeId> {
        let entry = self.node(node)?;
        if !entry.rect.contains(Pos::new(x, y)) {
            return None;
        }
        match &entry.kind {
            NodeKind::Root(root) => root
                .children
                .iter()
                .find_map(|&child| self.get_node_in_position(child, x, y)),
            _ => Some(node),
        }
    }

    /// First window reached by following first children down from `node`.
    pub(crate) fn first_window(&self, mut node: NodeId) -> NodeId {
        while let Some(root) = self.get(node).as_root() {
            match root.children.first() {
                Some(&first) => node = first,
                None => break,
            }
        }
        node
    }

    /// Set a divider to `ratio`, kept clear of its neighbours.
    ///
    /// The margin is `min_split_gap`, widened on small parents so a divider
    /// never closes the panel next to it.
    pub(crate) fn place_divider(&mut self, split: NodeId, ratio: f32) -> f32 {
        let Some(parent) = self.get(split).parent else {
            panic!("divider {split} has no parent");
        };
        let index = self.index_in_parent(parent, split);
        let count = self.root_node(parent).children.len();
        let (lo, hi) = self
            .root_node(parent)
            .direction
            .span(&self.get(parent).rect);
        let extent = (hi - lo + 1).max(1) as f32;
        let half = self.style.split_half_size;
        let gap = self.style.min_split_gap;
        // One pixel of panel past the band, or two half bands when another divider is there.
        let edge = gap.max((half + 1) as f32 / extent);
        let between = gap.max((2 * half + 1) as f32 / extent);

        let (before, after) = self.bounds(parent, index, 2);
        let min = before + if index >= 2 { between } else { edge };
        let max = after - if index + 2 < count { between } else { edge };
        let position = if min <= max {
            ratio.clamp(min, max)
        } else {
            (before + after) * 0.5
        };
        self.write_divider(split, position);
        position
    }

    /// Store a divider position and relayout its parent.
    pub(crate) fn write_divider(&mut self, split: NodeId, position: f32) {
        profile_scope!("write_divider");
        self.set_position(split, position);
        if let Some(parent) = self.get(split).parent {
            self.layout_subtree(parent);
        }
        tracing::trace!(%split, position, "moved divider");
    }
}

#[cfg(test)]
mod tests {
    use mosaic_core::id::WidgetId;

    use super::*;
    use crate::style::DockStyle;

    fn pair(direction: Direction) -> (Docker, NodeId, NodeId) {
        let mut docker = Docker::new(DockStyle::default());
        let w0 = docker
            .create_root_window(WidgetId::new("w0"), "W0")
            .unwrap();
        let w1 = docker
            .split_window(w0, direction, WidgetId::new("w1"), "W1")
            .unwrap();
        (docker, w0, w1)
    }

    #[test]
    fn test_vertical_pair_layout() {
        let (docker, w0, w1) = pair(Direction::Vertical);
        let split = docker.root_node(docker.root().unwrap()).children[1];
        assert_eq!(docker.rect(w0), Some(Rect::new(0, 0, 637, 719)));
        assert_eq!(docker.rect(split), Some(Rect::new(638, 0, 641, 719)));
        assert_eq!(docker.rect(w1), Some(Rect::new(642, 0, 1279, 719)));
    }

    #[test]
    fn test_horizontal_pair_layout() {
        let (docker, w0, w1) = pair(Direction::Horizontal);
        assert_eq!(docker.rect(w0), Some(Rect::new(0, 0, 1279, 357)));
        assert_eq!(docker.rect(w1), Some(Rect::new(0, 362, 1279, 719)));
    }

    #[test]
    fn test_resize_relayouts() {
        let (mut docker, w0, w1) = pair(Direction::Vertical);
        docker.resize(Size::new(800, 600));
        assert_eq!(docker.rect(w0), Some(Rect::new(0, 0, 397, 599)));
        assert_eq!(docker.rect(w1), Some(Rect::new(402, 0, 799, 599)));
    }

    #[test]
    fn test_hit_testing_skips_roots() {
        let (docker, w0, w1) = pair(Direction::Vertical);
        let split = docker.root_node(docker.root().unwrap()).children[1];
        assert_eq!(docker.node_at(Pos::new(10, 10)), Some(w0));
        assert_eq!(docker.node_at(Pos::new(639, 300)), Some(split));
        assert_eq!(docker.node_at(Pos::new(1279, 719)), Some(w1));
        assert_eq!(docker.node_at(Pos::new(1280, 10)), None);
    }

    #[test]
    fn test_place_divider_clamps_to_gap() {
        let (mut docker, w0, _) = pair(Direction::Vertical);
        let split = docker.root_node(docker.root().unwrap()).children[1];
        assert_eq!(docker.place_divider(split, 0.25), 0.25);
        assert_eq!(docker.rect(w0).map(|r| r.max_x), Some(317));
        assert!((docker.place_divider(split, -1.0) - 0.02).abs() < 1e-6);
        assert!((docker.place_divider(split, 4.0) - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_min_extent_sums_along_axis() {
        let (mut docker, w0, _) = pair(Direction::Vertical);
        let root = docker.root().unwrap();
        assert_eq!(docker.min_extent(root, Direction::Vertical), 6);
        assert_eq!(docker.min_extent(root, Direction::Horizontal), 1);

        docker
            .split_window(w0, Direction::Horizontal, WidgetId::new("w2"), "W2")
            .unwrap();
        assert_eq!(docker.min_extent(root, Direction::Vertical), 6);
        assert_eq!(docker.min_extent(root, Direction::Horizontal), 6);
    }

    #[test]
    fn test_bands_never_overlap_in_narrow_root() {
        let (mut docker, w0, w1) = pair(Direction::Vertical);
        let w2 = docker
            .split_window(w1, Direction::Vertical, WidgetId::new("w2"), "W2")
            .unwrap();
        docker.resize(Size::new(20, 100));
        let root = docker.root().unwrap();
        let second = docker.root_node(root).children[3];
        // Squeezing the divider by ratio alone would leave w1 less than a pixel.
        docker.set_position(second, 0.52);
        docker.recalculate();

        let spans: Vec<(i32, i32)> = docker
            .root_node(root)
            .children
            .iter()
            .map(|&child| docker.rect(child).map(|r| (r.min_x, r.max_x)).unwrap())
            .collect();
        for adjacent in spans.windows(2) {
            assert_eq!(adjacent[1].0, adjacent[0].1 + 1);
        }
        for window in [w0, w1, w2] {
            assert!(docker.rect(window).unwrap().width() >= 1);
        }
        docker.validate().unwrap();
    }

    #[test]
    fn test_first_window_descends() {
        let (mut docker, w0, _) = pair(Direction::Vertical);
        docker
            .split_window(w0, Direction::Horizontal, WidgetId::new("w2"), "W2")
            .unwrap();
        let root = docker.root().unwrap();
        let nested = docker.root_node(root).children[0];
        assert_ne!(nested, w0);
        assert_eq!(docker.first_window(root), w0);
        assert_eq!(docker.first_window(nested), w0);
    }
}
