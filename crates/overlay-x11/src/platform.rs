//! X11 window tree, overlay window management and the `Platform` impl

use std::collections::HashMap;

use overlay_core::{
    BackendError, BufferId, Color, FontId, FontSystem, Geometry, LineMetrics, Platform, WindowId, WindowSystem,
};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::shape;
use x11rb::protocol::Event;
use x11rb::protocol::xfixes::ConnectionExt as _;
use x11rb::protocol::xproto::{
    AtomEnum, ColormapAlloc, ConfigureWindowAux, ConnectionExt as _, CreateGCAux, CreateWindowAux, Gcontext, Screen,
    StackMode, VisualClass, Visualid, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;

use crate::error::X11Error;
use crate::fonts::FontStore;
use crate::surface::Buffer;

/// Longest `WM_CLASS` value read, in 32-bit units
const WM_CLASS_MAX_LEN: u32 = 256;

/// Resources behind one overlay window, released in reverse order
pub(crate) struct OverlayWindow {
    pub(crate) gc: Gcontext,
    colormap: u32,
}

/// X11 implementation of every overlay-core platform trait
pub struct X11Platform {
    pub(crate) conn: RustConnection,
    screen_num: usize,
    root: Window,
    visual: Option<Visualid>,
    xfixes: bool,
    pub(crate) windows: HashMap<WindowId, OverlayWindow>,
    pub(crate) buffers: HashMap<BufferId, Buffer>,
    pub(crate) next_buffer: u32,
    pub(crate) fonts: FontStore,
}

impl X11Platform {
    /// Connect to `$DISPLAY` and initialise fontconfig
    pub fn connect(dpi: f32) -> Result<Self, X11Error> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let visual = find_argb_visual(screen);
        if visual.is_none() {
            warn!("Screen {} has no 32-bit TrueColor visual", screen_num);
        }

        let xfixes = match conn.xfixes_query_version(5, 0) {
            Ok(cookie) => cookie.reply().is_ok(),
            Err(_) => false,
        };
        if !xfixes {
            warn!("XFixes unavailable, overlay will not be click-through");
        }

        let fonts = FontStore::new(dpi)?;
        info!("Connected to X server, screen {}", screen_num);

        Ok(Self {
            conn,
            screen_num,
            root,
            visual,
            xfixes,
            windows: HashMap::new(),
            buffers: HashMap::new(),
            next_buffer: 1,
            fonts,
        })
    }

    fn query_children(&self, parent: WindowId) -> Result<Vec<WindowId>, X11Error> {
        let reply = self.conn.query_tree(parent.0)?.reply()?;
        Ok(reply.children.into_iter().map(WindowId).collect())
    }

    fn query_class(&self, window: WindowId) -> Result<Option<String>, X11Error> {
        let reply = self
            .conn
            .get_property(false, window.0, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, WM_CLASS_MAX_LEN)?
            .reply()?;
        Ok(parse_wm_class(&reply.value))
    }

    fn query_geometry(&self, window: WindowId) -> Result<Geometry, X11Error> {
        let geometry = self.conn.get_geometry(window.0)?.reply()?;
        let origin = self.conn.translate_coordinates(window.0, self.root, 0, 0)?.reply()?;
        Ok(Geometry::new(
            i32::from(origin.dst_x),
            i32::from(origin.dst_y),
            u32::from(geometry.width),
            u32::from(geometry.height),
        ))
    }

    fn create_window(&mut self, geometry: Geometry) -> Result<WindowId, X11Error> {
        let visual = self.visual.ok_or(X11Error::NoArgbVisual {
            screen: self.screen_num,
        })?;

        let colormap = self.conn.generate_id()?;
        self.conn
            .create_colormap(ColormapAlloc::NONE, colormap, self.root, visual)?;

        let window = self.conn.generate_id()?;
        let aux = CreateWindowAux::new()
            .background_pixel(Color::TRANSPARENT.to_argb_pixel())
            .border_pixel(0)
            .override_redirect(1)
            .colormap(colormap);
        self.conn.create_window(
            32,
            window,
            self.root,
            clamp_i16(geometry.x),
            clamp_i16(geometry.y),
            clamp_u16(geometry.width),
            clamp_u16(geometry.height),
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &aux,
        )?;

        if self.xfixes {
            // An empty input region lets every event fall through
            let region = self.conn.generate_id()?;
            self.conn.xfixes_create_region(region, &[])?;
            self.conn
                .xfixes_set_window_shape_region(window, shape::SK::INPUT, 0, 0, region)?;
            self.conn.xfixes_destroy_region(region)?;
        }

        self.conn.map_window(window)?;
        self.configure(WindowId(window), geometry)?;

        let gc = self.conn.generate_id()?;
        self.conn.create_gc(gc, window, &CreateGCAux::new())?;
        self.conn.flush()?;

        self.windows.insert(WindowId(window), OverlayWindow { gc, colormap });
        Ok(WindowId(window))
    }

    /// Move, resize and raise above siblings
    fn configure(&self, window: WindowId, geometry: Geometry) -> Result<(), X11Error> {
        let aux = ConfigureWindowAux::new()
            .x(geometry.x)
            .y(geometry.y)
            .width(geometry.width.max(1))
            .height(geometry.height.max(1))
            .stack_mode(StackMode::ABOVE);
        self.conn.configure_window(window.0, &aux)?;
        Ok(())
    }

    /// Errors of unchecked requests are queued as events; drop them
    fn drain_events(&self) {
        loop {
            match self.conn.poll_for_event() {
                Ok(Some(Event::Error(e))) => debug!("Ignored X11 error: {:?}", e),
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read X11 events: {}", e);
                    break;
                }
            }
        }
    }

    fn release_window(&self, window: WindowId, resources: OverlayWindow) -> Result<(), X11Error> {
        self.conn.free_gc(resources.gc)?;
        self.conn.destroy_window(window.0)?;
        self.conn.free_colormap(resources.colormap)?;
        Ok(())
    }
}

impl WindowSystem for X11Platform {
    fn root_window(&self) -> WindowId {
        WindowId(self.root)
    }

    fn child_windows(&mut self, parent: WindowId) -> Result<Vec<WindowId>, BackendError> {
        Ok(self.query_children(parent)?)
    }

    fn class_name(&mut self, window: WindowId) -> Option<String> {
        match self.query_class(window) {
            Ok(class) => class,
            Err(e) => {
                debug!("No class for {:?}: {}", window, e);
                None
            }
        }
    }

    fn window_geometry(&mut self, window: WindowId) -> Option<Geometry> {
        match self.query_geometry(window) {
            Ok(geometry) => Some(geometry),
            Err(e) if e.is_window_gone() => {
                debug!("Window {:?} is gone: {}", window, e);
                None
            }
            Err(e) => {
                warn!("Geometry query for {:?} failed: {}", window, e);
                None
            }
        }
    }

    fn create_overlay_window(&mut self, geometry: Geometry) -> Result<WindowId, BackendError> {
        let window = self.create_window(geometry)?;
        debug!("Created overlay window {:?}", window);
        Ok(window)
    }

    fn move_resize_window(&mut self, window: WindowId, geometry: Geometry) -> Result<(), BackendError> {
        if !self.windows.contains_key(&window) {
            return Err(X11Error::UnknownHandle {
                kind: "window",
                id: window.0,
            }
            .into());
        }
        Ok(self.configure(window, geometry)?)
    }

    fn destroy_window(&mut self, window: WindowId) {
        let Some(resources) = self.windows.remove(&window) else {
            warn!("Destroying unknown overlay window {:?}", window);
            return;
        };
        if let Err(e) = self.release_window(window, resources) {
            warn!("Failed to destroy overlay window {:?}: {}", window, e);
        }
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        self.conn.flush().map_err(X11Error::from)?;
        self.drain_events();
        Ok(())
    }
}

impl FontSystem for X11Platform {
    fn open_font(&mut self, family: &str, size_pt: u32) -> Option<FontId> {
        self.fonts.open(family, size_pt)
    }

    fn close_font(&mut self, font: FontId) {
        self.fonts.close(font);
    }

    fn has_glyph(&self, font: FontId, ch: char) -> bool {
        self.fonts.has_glyph(font, ch)
    }

    fn line_metrics(&self, font: FontId) -> LineMetrics {
        self.fonts.line_metrics(font)
    }

    fn text_advance(&self, font: FontId, text: &str) -> i32 {
        self.fonts.text_advance(font, text)
    }
}

impl Platform for X11Platform {
    fn shutdown(&mut self) {
        // Contexts and surfaces before the windows they are shown on
        self.buffers.clear();
        let windows: Vec<_> = self.windows.drain().collect();
        for (window, resources) in windows {
            if let Err(e) = self.release_window(window, resources) {
                warn!("Failed to destroy overlay window {:?}: {}", window, e);
            }
        }
        if let Err(e) = self.conn.flush() {
            warn!("Final flush failed: {}", e);
        }
        debug!("X11 platform released ({} fonts still open)", self.fonts.open_count());
    }
}

fn find_argb_visual(screen: &Screen) -> Option<Visualid> {
    screen
        .allowed_depths
        .iter()
        .filter(|depth| depth.depth == 32)
        .flat_map(|depth| depth.visuals.iter())
        .find(|visual| visual.class == VisualClass::TRUE_COLOR)
        .map(|visual| visual.visual_id)
}

/// Class part of a `WM_CLASS` value (`instance\0class\0`)
fn parse_wm_class(value: &[u8]) -> Option<String> {
    let mut parts = value.split(|&b| b == 0);
    let _instance = parts.next()?;
    let class = parts.next()?;
    if class.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(class).into_owned())
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value.max(1)).unwrap_or(u16::MAX)
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wm_class() {
        assert_eq!(parse_wm_class(b"gst-launch-1.0\0GStreamer\0").as_deref(), Some("GStreamer"));
        assert_eq!(parse_wm_class(b"xterm\0XTerm").as_deref(), Some("XTerm"));
    }

    #[test]
    fn test_parse_wm_class_missing_class() {
        assert_eq!(parse_wm_class(b""), None);
        assert_eq!(parse_wm_class(b"only-instance"), None);
        assert_eq!(parse_wm_class(b"instance\0\0"), None);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_u16(0), 1);
        assert_eq!(clamp_u16(70_000), u16::MAX);
        assert_eq!(clamp_i16(-40_000), i16::MIN);
        assert_eq!(clamp_i16(1920), 1920);
    }
}
