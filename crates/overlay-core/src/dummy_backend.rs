//! Dummy platform for exercising the overlay without a display server.
//!
//! Keeps an in-memory window tree and a handful of synthetic fonts, and
//! records every drawing operation so tests can assert on exact output.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use crate::color::Color;
use crate::traits::{
    BackendError, BufferId, DrawingSurface, FontId, FontSystem, Geometry, LineMetrics, Platform, Rect,
    WindowId, WindowSystem,
};

/// Synthetic font: metrics are percentages of the point size
#[derive(Clone, Debug)]
pub struct DummyFont {
    pub coverage: Vec<RangeInclusive<u32>>,
    pub advance_pct: i32,
    pub ascent_pct: i32,
    pub descent_pct: i32,
}

impl DummyFont {
    fn covers(&self, ch: char) -> bool {
        self.coverage.iter().any(|range| range.contains(&(ch as u32)))
    }

    fn scaled(pct: i32, size_pt: u32) -> i32 {
        size_pt as i32 * pct / 100
    }
}

/// One recorded drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear {
        buffer: BufferId,
    },
    FillRect {
        buffer: BufferId,
        rect: Rect,
        color: Color,
    },
    Text {
        buffer: BufferId,
        font: FontId,
        x: i32,
        baseline: i32,
        text: String,
        color: Color,
    },
    Present {
        buffer: BufferId,
        window: WindowId,
    },
}

struct DummyWindow {
    class: Option<String>,
    geometry: Geometry,
    children: Vec<WindowId>,
}

struct OpenFont {
    family: String,
    size_pt: u32,
}

/// Dummy platform that implements all traits for testing
pub struct DummyPlatform {
    root: WindowId,
    windows: HashMap<WindowId, DummyWindow>,
    overlays: Vec<WindowId>,
    next_id: u32,
    families: HashMap<String, DummyFont>,
    fonts: BTreeMap<FontId, OpenFont>,
    fonts_available: bool,
    buffers: HashMap<BufferId, (u32, u32)>,
    draw_calls: Vec<DrawCall>,
    flushes: usize,
    advance_queries: Cell<usize>,
    stale_accesses: usize,
    fail_overlay_creation: bool,
    fail_buffer_creation: bool,
}

impl Default for DummyPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyPlatform {
    /// Create a platform with an empty root window and three fonts:
    /// "Consolas" (Latin), "Noto Color Emoji" and "DejaVu Sans" (wide
    /// symbol coverage)
    pub fn new() -> Self {
        let root = WindowId(1);
        let mut windows = HashMap::new();
        windows.insert(
            root,
            DummyWindow {
                class: None,
                geometry: Geometry::new(0, 0, 1920, 1080),
                children: Vec::new(),
            },
        );

        let mut platform = DummyPlatform {
            root,
            windows,
            overlays: Vec::new(),
            next_id: 2,
            families: HashMap::new(),
            fonts: BTreeMap::new(),
            fonts_available: true,
            buffers: HashMap::new(),
            draw_calls: Vec::new(),
            flushes: 0,
            advance_queries: Cell::new(0),
            stale_accesses: 0,
            fail_overlay_creation: false,
            fail_buffer_creation: false,
        };

        platform.install_font(
            "Consolas",
            DummyFont {
                coverage: vec![0x20..=0x7E, 0xA0..=0x24F],
                advance_pct: 50,
                ascent_pct: 80,
                descent_pct: 20,
            },
        );
        platform.install_font(
            "Noto Color Emoji",
            DummyFont {
                coverage: vec![0x2600..=0x27BF, 0x1F300..=0x1FAFF],
                advance_pct: 100,
                ascent_pct: 90,
                descent_pct: 25,
            },
        );
        platform.install_font(
            "DejaVu Sans",
            DummyFont {
                coverage: vec![0x20..=0x7E, 0xA0..=0x2FFF],
                advance_pct: 60,
                ascent_pct: 80,
                descent_pct: 20,
            },
        );
        platform
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn root(&self) -> WindowId {
        self.root
    }

    /// Add a window as the last child of `parent`
    pub fn add_window(&mut self, parent: WindowId, class: &str, geometry: Geometry) -> WindowId {
        let id = WindowId(self.next_id());
        self.windows.insert(
            id,
            DummyWindow {
                class: Some(class.to_string()),
                geometry,
                children: Vec::new(),
            },
        );
        self.link_child(parent, id);
        id
    }

    /// Make `child` appear under `parent` as well
    pub fn link_child(&mut self, parent: WindowId, child: WindowId) {
        if let Some(window) = self.windows.get_mut(&parent) {
            window.children.push(child);
        }
    }

    /// Destroy a window; its handle becomes invalid
    pub fn remove_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
        self.overlays.retain(|&w| w != window);
        for other in self.windows.values_mut() {
            other.children.retain(|&c| c != window);
        }
    }

    pub fn set_geometry(&mut self, window: WindowId, geometry: Geometry) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.geometry = geometry;
        }
    }

    pub fn geometry_of(&self, window: WindowId) -> Option<Geometry> {
        self.windows.get(&window).map(|w| w.geometry)
    }

    pub fn install_font(&mut self, family: &str, font: DummyFont) {
        self.families.insert(family.to_string(), font);
    }

    /// Simulate a font subsystem that cannot open anything
    pub fn set_fonts_available(&mut self, available: bool) {
        self.fonts_available = available;
    }

    pub fn set_fail_overlay_creation(&mut self, fail: bool) {
        self.fail_overlay_creation = fail;
    }

    pub fn set_fail_buffer_creation(&mut self, fail: bool) {
        self.fail_buffer_creation = fail;
    }

    pub fn open_font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn font_family(&self, font: FontId) -> Option<String> {
        self.fonts.get(&font).map(|f| f.family.clone())
    }

    pub fn font_size(&self, font: FontId) -> Option<u32> {
        self.fonts.get(&font).map(|f| f.size_pt)
    }

    /// Live overlay windows
    pub fn overlay_windows(&self) -> &[WindowId] {
        &self.overlays
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer_size(&self, buffer: BufferId) -> Option<(u32, u32)> {
        self.buffers.get(&buffer).copied()
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn clear_draw_calls(&mut self) {
        self.draw_calls.clear();
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// How many times a text advance has been measured
    pub fn advance_queries(&self) -> usize {
        self.advance_queries.get()
    }

    /// Operations that referenced a destroyed or unknown handle
    pub fn stale_accesses(&self) -> usize {
        self.stale_accesses
    }

    fn record(&mut self, buffer: BufferId, call: DrawCall) {
        if self.buffers.contains_key(&buffer) {
            self.draw_calls.push(call);
        } else {
            self.stale_accesses += 1;
        }
    }

    fn font_def(&self, font: FontId) -> Option<(&DummyFont, u32)> {
        let open = self.fonts.get(&font)?;
        let def = self.families.get(&open.family)?;
        Some((def, open.size_pt))
    }
}

impl WindowSystem for DummyPlatform {
    fn root_window(&self) -> WindowId {
        self.root
    }

    fn child_windows(&mut self, parent: WindowId) -> Result<Vec<WindowId>, BackendError> {
        self.windows
            .get(&parent)
            .map(|w| w.children.clone())
            .ok_or_else(|| BackendError::Window(format!("bad window {:?}", parent)))
    }

    fn class_name(&mut self, window: WindowId) -> Option<String> {
        self.windows.get(&window).and_then(|w| w.class.clone())
    }

    fn window_geometry(&mut self, window: WindowId) -> Option<Geometry> {
        self.geometry_of(window)
    }

    fn create_overlay_window(&mut self, geometry: Geometry) -> Result<WindowId, BackendError> {
        if self.fail_overlay_creation {
            return Err(BackendError::Window("no 32-bit visual".to_string()));
        }
        let id = WindowId(self.next_id());
        self.windows.insert(
            id,
            DummyWindow {
                class: None,
                geometry,
                children: Vec::new(),
            },
        );
        let root = self.root;
        self.link_child(root, id);
        self.overlays.push(id);
        Ok(id)
    }

    fn move_resize_window(&mut self, window: WindowId, geometry: Geometry) -> Result<(), BackendError> {
        match self.windows.get_mut(&window) {
            Some(w) => {
                w.geometry = geometry;
                Ok(())
            }
            None => {
                self.stale_accesses += 1;
                Err(BackendError::Window(format!("bad window {:?}", window)))
            }
        }
    }

    fn destroy_window(&mut self, window: WindowId) {
        if !self.windows.contains_key(&window) {
            self.stale_accesses += 1;
        }
        self.remove_window(window);
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        self.flushes += 1;
        Ok(())
    }
}

impl DrawingSurface for DummyPlatform {
    fn create_buffer(&mut self, window: WindowId, width: u32, height: u32) -> Result<BufferId, BackendError> {
        if self.fail_buffer_creation {
            return Err(BackendError::Rendering("out of memory".to_string()));
        }
        if !self.windows.contains_key(&window) {
            self.stale_accesses += 1;
            return Err(BackendError::Window(format!("bad window {:?}", window)));
        }
        let id = BufferId(self.next_id());
        self.buffers.insert(id, (width, height));
        Ok(id)
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_none() {
            self.stale_accesses += 1;
        }
    }

    fn clear_buffer(&mut self, buffer: BufferId) {
        self.record(buffer, DrawCall::Clear { buffer });
    }

    fn fill_rect(&mut self, buffer: BufferId, rect: Rect, color: Color) {
        self.record(buffer, DrawCall::FillRect { buffer, rect, color });
    }

    fn draw_text(&mut self, buffer: BufferId, font: FontId, x: i32, baseline: i32, text: &str, color: Color) {
        if !self.fonts.contains_key(&font) {
            self.stale_accesses += 1;
        }
        self.record(
            buffer,
            DrawCall::Text {
                buffer,
                font,
                x,
                baseline,
                text: text.to_string(),
                color,
            },
        );
    }

    fn present(&mut self, buffer: BufferId, window: WindowId) -> Result<(), BackendError> {
        if !self.windows.contains_key(&window) {
            self.stale_accesses += 1;
            return Err(BackendError::Window(format!("bad window {:?}", window)));
        }
        self.record(buffer, DrawCall::Present { buffer, window });
        Ok(())
    }
}

impl FontSystem for DummyPlatform {
    fn open_font(&mut self, family: &str, size_pt: u32) -> Option<FontId> {
        if !self.fonts_available || !self.families.contains_key(family) {
            return None;
        }
        let id = FontId(self.next_id());
        self.fonts.insert(
            id,
            OpenFont {
                family: family.to_string(),
                size_pt,
            },
        );
        Some(id)
    }

    fn close_font(&mut self, font: FontId) {
        if self.fonts.remove(&font).is_none() {
            self.stale_accesses += 1;
        }
    }

    fn has_glyph(&self, font: FontId, ch: char) -> bool {
        self.font_def(font).is_some_and(|(def, _)| def.covers(ch))
    }

    fn line_metrics(&self, font: FontId) -> LineMetrics {
        self.font_def(font)
            .map(|(def, size)| LineMetrics {
                ascent: DummyFont::scaled(def.ascent_pct, size),
                descent: DummyFont::scaled(def.descent_pct, size),
            })
            .unwrap_or_default()
    }

    fn text_advance(&self, font: FontId, text: &str) -> i32 {
        self.advance_queries.set(self.advance_queries.get() + 1);
        self.font_def(font)
            .map(|(def, size)| text.chars().count() as i32 * DummyFont::scaled(def.advance_pct, size))
            .unwrap_or(0)
    }
}

impl Platform for DummyPlatform {}
