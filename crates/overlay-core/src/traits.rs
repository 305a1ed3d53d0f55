//! Platform boundary: the windowing system, the font subsystem and the 2D
//! drawing surface the overlay is built on.

use crate::color::Color;

/// Handle to a platform window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

/// Handle to an off-screen pixel buffer and its drawing context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Handle to an opened font at a fixed size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u32);

/// Absolute screen position and size of a window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn same_size(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

/// Axis-aligned pixel rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Vertical extents of a font in pixels, both positive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineMetrics {
    pub ascent: i32,
    pub descent: i32,
}

/// Window enumeration, geometry and overlay window management
pub trait WindowSystem {
    fn root_window(&self) -> WindowId;
    fn child_windows(&mut self, parent: WindowId) -> Result<Vec<WindowId>, BackendError>;
    /// Class part of the window's class hint, if it has one
    fn class_name(&mut self, window: WindowId) -> Option<String>;
    /// `None` once the window no longer exists
    fn window_geometry(&mut self, window: WindowId) -> Option<Geometry>;
    /// Always-on-top, input-transparent window at `geometry`
    fn create_overlay_window(&mut self, geometry: Geometry) -> Result<WindowId, BackendError>;
    fn move_resize_window(&mut self, window: WindowId, geometry: Geometry) -> Result<(), BackendError>;
    fn destroy_window(&mut self, window: WindowId);
    fn flush(&mut self) -> Result<(), BackendError>;
}

/// Off-screen buffers and the primitives drawn into them
pub trait DrawingSurface {
    fn create_buffer(&mut self, window: WindowId, width: u32, height: u32) -> Result<BufferId, BackendError>;
    /// Releases the drawing context before the pixel storage
    fn destroy_buffer(&mut self, buffer: BufferId);
    /// Fill with fully transparent pixels
    fn clear_buffer(&mut self, buffer: BufferId);
    fn fill_rect(&mut self, buffer: BufferId, rect: Rect, color: Color);
    /// Draw UTF-8 text with its baseline starting at `(x, baseline)`
    fn draw_text(&mut self, buffer: BufferId, font: FontId, x: i32, baseline: i32, text: &str, color: Color);
    /// Copy the whole buffer onto `window`, replacing its contents
    fn present(&mut self, buffer: BufferId, window: WindowId) -> Result<(), BackendError>;
}

/// Font matching, coverage and measurement
pub trait FontSystem {
    /// Best match for `family` at `size_pt`
    fn open_font(&mut self, family: &str, size_pt: u32) -> Option<FontId>;
    fn close_font(&mut self, font: FontId);
    fn has_glyph(&self, font: FontId, ch: char) -> bool;
    fn line_metrics(&self, font: FontId) -> LineMetrics;
    /// Horizontal pen advance for `text` in pixels
    fn text_advance(&self, font: FontId, text: &str) -> i32;
}

/// Everything the overlay needs from the host platform
pub trait Platform: WindowSystem + DrawingSurface + FontSystem {
    /// Release the platform connection
    fn shutdown(&mut self) {}
}

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Rendering error: {0}")]
    Rendering(String),

    #[error("Font error: {0}")]
    Font(String),
}
