use mosaic_core::geometry::Size;

/// Metrics of the dock tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockStyle {
    /// Height of the grab strip at the top of each window.
    pub title_bar_height: i32,
    /// Half the thickness of a divider band, in pixels.
    pub split_half_size: i32,
    /// Smallest distance between two dividers of one root, as a fraction of its extent.
    pub min_split_gap: f32,
    /// Viewport size until the host reports a resize.
    pub viewport: Size<i32>,
}

impl Default for DockStyle {
    fn default() -> Self {
        Self {
            title_bar_height: 24,
            split_half_size: 2,
            min_split_gap: 0.02,
            viewport: Size::new(1280, 720),
        }
    }
}

impl DockStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title_bar_height(mut self, height: i32) -> Self {
        self.title_bar_height = height;
        self
    }

    pub fn split_half_size(mut self, half_size: i32) -> Self {
        self.split_half_size = half_size;
        self
    }

    pub fn min_split_gap(mut self, gap: f32) -> Self {
        self.min_split_gap = gap;
        self
    }

    pub fn viewport(mut self, size: Size<i32>) -> Self {
        self.viewport = size;
        self
    }
}
