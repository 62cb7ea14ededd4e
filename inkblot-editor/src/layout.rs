//! Pane sizing.

/// Narrowest editor share of the split.
pub const MIN_SPLIT_RATIO: f32 = 0.2;
/// Widest editor share of the split.
pub const MAX_SPLIT_RATIO: f32 = 0.8;
/// Sidebar width bounds, in pixels.
pub const MIN_SIDEBAR_WIDTH: f32 = 140.0;
pub const MAX_SIDEBAR_WIDTH: f32 = 400.0;

const DEFAULT_SIDEBAR_WIDTH: f32 = 220.0;

/// Which divider is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// Between editor and preview.
    Split,
    /// Between sidebar and editor.
    Sidebar,
}

/// Editor/preview split, sidebar width, and preview full-screen mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLayout {
    ratio: f32,
    sidebar_width: f32,
    dragging: Option<DragTarget>,
    preview_fullscreen: bool,
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self {
            ratio: 0.5,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            dragging: None,
            preview_fullscreen: false,
        }
    }
}

impl SplitLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor share of the split.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Preview share of the split.
    pub fn preview_ratio(&self) -> f32 {
        1.0 - self.ratio
    }

    pub fn sidebar_width(&self) -> f32 {
        self.sidebar_width
    }

    pub fn dragging(&self) -> Option<DragTarget> {
        self.dragging
    }

    pub fn begin_drag(&mut self, target: DragTarget) {
        self.dragging = Some(target);
    }

    /// Applies a pointer move. Ignored unless a drag is in progress.
    ///
    /// Returns true if anything was resized.
    pub fn drag_to(&mut self, pointer_x: f32, container_left: f32, container_width: f32) -> bool {
        match self.dragging {
            Some(DragTarget::Split) => {
                if !container_width.is_finite() || container_width <= 0.0 || !pointer_x.is_finite() {
                    return false;
                }
                let ratio = (pointer_x - container_left) / container_width;
                self.ratio = ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
                true
            }
            Some(DragTarget::Sidebar) => self.set_sidebar_width(pointer_x),
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Sets the sidebar width, clamped. Returns false for non-finite input.
    pub fn set_sidebar_width(&mut self, width: f32) -> bool {
        if !width.is_finite() {
            return false;
        }
        self.sidebar_width = width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
        true
    }

    /// Flips preview full-screen mode, returning the new value.
    pub fn toggle_preview_fullscreen(&mut self) -> bool {
        self.preview_fullscreen = !self.preview_fullscreen;
        self.preview_fullscreen
    }

    pub fn is_preview_fullscreen(&self) -> bool {
        self.preview_fullscreen
    }
}
