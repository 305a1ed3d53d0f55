//! Overlay lifecycle: find the target window, glue a transparent
//! click-through window to it and keep an off-screen buffer of matching
//! size to draw into.
//!
//! The target can disappear at any moment. Every resource-touching
//! operation goes through [`OverlayState::Bound`], so once the target is
//! lost nothing is ever drawn against a released handle.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::color::Color;
use crate::config::OverlayConfig;
use crate::constants::SEARCH_STATUS_EVERY;
use crate::drawing::{Alignment, TextRenderer};
use crate::error::{OverlayError, OverlayResult};
use crate::search::find_window_by_class;
use crate::traits::{BackendError, BufferId, Geometry, Platform, WindowId};

/// Opens the platform connection on first use
pub type Connector<P> = Box<dyn FnMut() -> Result<P, BackendError>>;

/// The off-screen buffer of a bound session and the size it was created at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBuffers {
    pub buffer: BufferId,
    pub width: u32,
    pub height: u32,
}

/// Resources owned while tracking a live target window
#[derive(Debug)]
pub struct Session {
    target: WindowId,
    overlay: WindowId,
    geometry: Geometry,
    frame: FrameBuffers,
}

impl Session {
    pub fn target(&self) -> WindowId {
        self.target
    }

    pub fn overlay_window(&self) -> WindowId {
        self.overlay
    }

    /// Target geometry as of the last sync
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn frame(&self) -> FrameBuffers {
        self.frame
    }
}

#[derive(Debug, Default)]
pub enum OverlayState {
    #[default]
    Uninitialized,
    Searching {
        class_name: String,
    },
    Bound {
        class_name: String,
        session: Session,
    },
}

impl OverlayState {
    pub fn is_bound(&self) -> bool {
        matches!(self, OverlayState::Bound { .. })
    }

    /// Class name being searched for or tracked
    pub fn class_name(&self) -> Option<&str> {
        match self {
            OverlayState::Uninitialized => None,
            OverlayState::Searching { class_name } | OverlayState::Bound { class_name, .. } => Some(class_name),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            OverlayState::Bound { session, .. } => Some(session),
            _ => None,
        }
    }
}

/// Transparent overlay tracking a foreign window.
///
/// Single-threaded: the caller drives it from one polling loop.
pub struct Overlay<P: Platform> {
    config: OverlayConfig,
    connector: Connector<P>,
    platform: Option<P>,
    state: OverlayState,
    renderer: TextRenderer,
    last_attempt: Option<Instant>,
    search_attempts: u64,
}

impl<P: Platform> Overlay<P> {
    pub fn new<C>(config: OverlayConfig, connector: C) -> Self
    where
        C: FnMut() -> Result<P, BackendError> + 'static,
    {
        Self {
            renderer: TextRenderer::new(&config),
            config,
            connector: Box::new(connector),
            platform: None,
            state: OverlayState::Uninitialized,
            last_attempt: None,
            search_attempts: 0,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn platform(&self) -> Option<&P> {
        self.platform.as_ref()
    }

    pub fn platform_mut(&mut self) -> Option<&mut P> {
        self.platform.as_mut()
    }

    pub fn renderer(&self) -> &TextRenderer {
        &self.renderer
    }

    pub fn frame_buffers(&self) -> Option<FrameBuffers> {
        self.state.session().map(Session::frame)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_bound()
    }

    /// Width of the tracked window, 0 when not bound
    pub fn width(&self) -> u32 {
        self.state.session().map_or(0, |s| s.geometry.width)
    }

    /// Height of the tracked window, 0 when not bound
    pub fn height(&self) -> u32 {
        self.state.session().map_or(0, |s| s.geometry.height)
    }

    /// Search for a window of class `class_name` and bind to it.
    ///
    /// `Ok(false)` means no such window exists yet; the class is retained
    /// and the caller should retry later. `Err` is reserved for conditions
    /// retrying cannot fix.
    pub fn try_initialize(&mut self, class_name: &str) -> OverlayResult<bool> {
        if let OverlayState::Bound { class_name: bound, session } = &self.state {
            if bound == class_name {
                let target = session.target;
                if self.platform.as_mut().is_some_and(|p| p.window_geometry(target).is_some()) {
                    return Ok(true);
                }
                info!("Target window {:?} lost, searching for '{}' again", target, class_name);
            } else {
                info!("Retargeting overlay from '{}' to '{}'", bound, class_name);
            }
            self.release_session();
        }

        if self.platform.is_none() {
            let platform = (self.connector)().map_err(OverlayError::from_connect)?;
            info!("Connected to windowing platform");
            self.platform = Some(platform);
        }
        let Some(platform) = self.platform.as_mut() else {
            return Ok(false);
        };

        self.state = OverlayState::Searching {
            class_name: class_name.to_string(),
        };
        self.last_attempt = Some(Instant::now());
        self.search_attempts += 1;

        let root = platform.root_window();
        let Some(target) = find_window_by_class(platform, root, class_name, self.config.max_search_depth) else {
            if self.search_attempts == 1 || self.search_attempts % SEARCH_STATUS_EVERY == 0 {
                info!("No window with class '{}' yet ({} attempts)", class_name, self.search_attempts);
            } else {
                debug!("Search attempt {} for '{}' missed", self.search_attempts, class_name);
            }
            return Ok(false);
        };

        let Some(geometry) = platform.window_geometry(target) else {
            debug!("Window {:?} vanished before its geometry could be read", target);
            return Ok(false);
        };

        let session = open_session(platform, &mut self.renderer, target, geometry)?;
        info!(
            "Bound to '{}' window {:?} at {}x{}+{}+{}",
            class_name, target, geometry.width, geometry.height, geometry.x, geometry.y
        );
        self.state = OverlayState::Bound {
            class_name: class_name.to_string(),
            session,
        };
        self.search_attempts = 0;
        Ok(true)
    }

    /// Follow the target: move and resize the overlay, recreate the
    /// off-screen buffer on size changes, or fall back to searching if
    /// the target is gone.
    pub fn update_window_position(&mut self) {
        let OverlayState::Bound { session, .. } = &mut self.state else {
            return;
        };
        let Some(platform) = self.platform.as_mut() else {
            return;
        };

        let Some(geometry) = platform.window_geometry(session.target) else {
            info!("Target window {:?} lost, searching again", session.target);
            self.release_session();
            return;
        };

        if let Err(e) = platform.move_resize_window(session.overlay, geometry) {
            warn!("Failed to sync overlay window: {}", e);
        }

        if !session.geometry.same_size(geometry.width, geometry.height) {
            debug!(
                "Target resized {}x{} -> {}x{}",
                session.geometry.width, session.geometry.height, geometry.width, geometry.height
            );
            platform.destroy_buffer(session.frame.buffer);
            match create_frame(platform, session.overlay, geometry) {
                Ok(frame) => session.frame = frame,
                Err(e) => {
                    warn!("Failed to recreate off-screen buffer: {}", e);
                    // The old buffer is already gone
                    platform.destroy_window(session.overlay);
                    self.renderer.release(platform);
                    self.demote();
                    return;
                }
            }
        }
        session.geometry = geometry;
    }

    /// One tick of the polling loop. Returns whether a frame can be drawn.
    ///
    /// While searching, a new attempt is made at most once per retry
    /// interval. From `Uninitialized` the configured target class is used.
    pub fn poll(&mut self) -> OverlayResult<bool> {
        let class_name = match &self.state {
            OverlayState::Bound { .. } => {
                self.update_window_position();
                return Ok(self.is_initialized());
            }
            OverlayState::Searching { class_name } => {
                let retry = Duration::from_millis(self.config.retry_interval_ms);
                if self.last_attempt.is_some_and(|t| t.elapsed() < retry) {
                    return Ok(false);
                }
                class_name.clone()
            }
            OverlayState::Uninitialized => self.config.target_class.clone(),
        };
        self.try_initialize(&class_name)
    }

    /// Release everything, including the platform connection. Safe to
    /// call in any state.
    pub fn shutdown(&mut self) {
        self.release_session();
        self.state = OverlayState::Uninitialized;
        if let Some(mut platform) = self.platform.take() {
            self.renderer.release(&mut platform);
            platform.shutdown();
            info!("Overlay shut down");
        }
        self.last_attempt = None;
        self.search_attempts = 0;
    }

    /// Clear the off-screen buffer to fully transparent
    pub fn begin_frame(&mut self) {
        if let Some((platform, _, frame, _)) = self.bound_parts() {
            platform.clear_buffer(frame.buffer);
        }
    }

    /// Replace the overlay contents with the off-screen buffer and flush
    pub fn end_frame(&mut self) {
        let Some((platform, _, frame, overlay)) = self.bound_parts() else {
            return;
        };
        if let Err(e) = platform.present(frame.buffer, overlay) {
            warn!("Failed to present frame: {}", e);
        }
        if let Err(e) = platform.flush() {
            warn!("Flush failed: {}", e);
        }
    }

    /// Change the active font; cached metrics are dropped if it differs
    pub fn set_font(&mut self, family: &str, size_pt: u32) {
        self.renderer.set_font(family, size_pt);
    }

    pub fn draw_string_plain(
        &mut self,
        text: impl AsRef<[u8]>,
        x: i32,
        y: i32,
        color: Color,
        align: Alignment,
    ) -> OverlayResult<()> {
        if let Some((platform, renderer, frame, _)) = self.bound_parts() {
            renderer.draw_plain(platform, frame.buffer, text.as_ref(), x, y, color, align)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_string_outline(
        &mut self,
        text: impl AsRef<[u8]>,
        x: i32,
        y: i32,
        color: Color,
        outline_color: Color,
        outline_width: i32,
        align: Alignment,
    ) -> OverlayResult<()> {
        if let Some((platform, renderer, frame, _)) = self.bound_parts() {
            renderer.draw_outline(
                platform,
                frame.buffer,
                text.as_ref(),
                x,
                y,
                color,
                outline_color,
                outline_width,
                align,
            )?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_string_background(
        &mut self,
        text: impl AsRef<[u8]>,
        x: i32,
        y: i32,
        color: Color,
        background: Color,
        padding: i32,
        align: Alignment,
    ) -> OverlayResult<()> {
        if let Some((platform, renderer, frame, _)) = self.bound_parts() {
            renderer.draw_background(platform, frame.buffer, text.as_ref(), x, y, color, background, padding, align)?;
        }
        Ok(())
    }

    /// Size of `text` in the active font, `(0, 0)` when not bound
    pub fn text_size(&mut self, text: impl AsRef<[u8]>) -> OverlayResult<(i32, i32)> {
        match self.bound_parts() {
            Some((platform, renderer, _, _)) => Ok(renderer.text_size(platform, text.as_ref())?),
            None => Ok((0, 0)),
        }
    }

    fn bound_parts(&mut self) -> Option<(&mut P, &mut TextRenderer, FrameBuffers, WindowId)> {
        let OverlayState::Bound { session, .. } = &self.state else {
            return None;
        };
        let (frame, overlay) = (session.frame, session.overlay);
        let platform = self.platform.as_mut()?;
        Some((platform, &mut self.renderer, frame, overlay))
    }

    /// Bound -> Searching, keeping the class name
    fn demote(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            OverlayState::Bound { class_name, .. } | OverlayState::Searching { class_name } => {
                OverlayState::Searching { class_name }
            }
            OverlayState::Uninitialized => OverlayState::Uninitialized,
        };
        self.last_attempt = None;
    }

    /// Tear down a bound session in dependency order and demote to
    /// searching. No-op when not bound.
    fn release_session(&mut self) {
        let OverlayState::Bound { session, .. } = &self.state else {
            return;
        };
        if let Some(platform) = self.platform.as_mut() {
            platform.destroy_buffer(session.frame.buffer);
            platform.destroy_window(session.overlay);
            self.renderer.release(platform);
            if let Err(e) = platform.flush() {
                warn!("Flush after teardown failed: {}", e);
            }
        }
        self.demote();
    }
}

impl<P: Platform> Drop for Overlay<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn create_frame<P: Platform + ?Sized>(
    platform: &mut P,
    overlay: WindowId,
    geometry: Geometry,
) -> Result<FrameBuffers, BackendError> {
    let width = geometry.width.max(1);
    let height = geometry.height.max(1);
    let buffer = platform.create_buffer(overlay, width, height)?;
    Ok(FrameBuffers { buffer, width, height })
}

/// Create the overlay window, its buffer and the font set. Anything
/// already created is released again if a later step fails.
fn open_session<P: Platform + ?Sized>(
    platform: &mut P,
    renderer: &mut TextRenderer,
    target: WindowId,
    geometry: Geometry,
) -> OverlayResult<Session> {
    let overlay = platform
        .create_overlay_window(geometry)
        .map_err(|e| OverlayError::ResourceCreationFailed {
            message: format!("overlay window: {}", e),
        })?;

    let frame = match create_frame(platform, overlay, geometry) {
        Ok(frame) => frame,
        Err(e) => {
            platform.destroy_window(overlay);
            return Err(OverlayError::ResourceCreationFailed {
                message: format!("off-screen buffer: {}", e),
            });
        }
    };

    if let Err(e) = renderer.load_font_set(platform) {
        platform.destroy_buffer(frame.buffer);
        platform.destroy_window(overlay);
        return Err(e.into());
    }

    if let Err(e) = platform.flush() {
        warn!("Flush after bind failed: {}", e);
    }

    Ok(Session {
        target,
        overlay,
        geometry,
        frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_backend::{DrawCall, DummyPlatform};

    const TARGET: Geometry = Geometry {
        x: 100,
        y: 50,
        width: 640,
        height: 480,
    };

    fn overlay_with_target() -> Overlay<DummyPlatform> {
        Overlay::new(OverlayConfig::default().with_retry_interval_ms(0), || {
            let mut platform = DummyPlatform::new();
            let app = platform.add_window(platform.root(), "Desktop", Geometry::new(0, 0, 1920, 1080));
            platform.add_window(app, "GStreamer", TARGET);
            Ok(platform)
        })
    }

    fn empty_overlay() -> Overlay<DummyPlatform> {
        Overlay::new(OverlayConfig::default().with_retry_interval_ms(0), || Ok(DummyPlatform::new()))
    }

    fn target_of(overlay: &Overlay<DummyPlatform>) -> WindowId {
        overlay.state().session().unwrap().target()
    }

    #[test]
    fn test_bind_creates_matching_resources() {
        let mut overlay = overlay_with_target();
        assert!(overlay.try_initialize("GStreamer").unwrap());
        assert!(overlay.is_initialized());
        assert_eq!((overlay.width(), overlay.height()), (640, 480));

        let session = overlay.state().session().unwrap();
        let (window, frame) = (session.overlay_window(), session.frame());
        let platform = overlay.platform().unwrap();
        assert_eq!(platform.overlay_windows(), &[window]);
        assert_eq!(platform.geometry_of(window), Some(TARGET));
        assert_eq!(platform.buffer_size(frame.buffer), Some((640, 480)));
        assert!(platform.open_font_count() > 0);
    }

    #[test]
    fn test_missing_target_stays_searching() {
        let mut overlay = empty_overlay();
        assert!(!overlay.try_initialize("GStreamer").unwrap());
        assert_eq!(overlay.state().class_name(), Some("GStreamer"));
        assert!(!overlay.is_initialized());

        let platform = overlay.platform().unwrap();
        assert!(platform.overlay_windows().is_empty());
        assert_eq!(platform.live_buffers(), 0);
    }

    #[test]
    fn test_connect_failures_are_fatal() {
        let mut overlay: Overlay<DummyPlatform> = Overlay::new(OverlayConfig::default(), || {
            Err(BackendError::Connection("cannot open display".to_string()))
        });
        assert!(matches!(
            overlay.try_initialize("GStreamer"),
            Err(OverlayError::PlatformUnavailable { .. })
        ));

        let mut overlay: Overlay<DummyPlatform> =
            Overlay::new(OverlayConfig::default(), || Err(BackendError::Font("no fontconfig".to_string())));
        assert!(matches!(
            overlay.try_initialize("GStreamer"),
            Err(OverlayError::FontSystemUnavailable { .. })
        ));
    }

    #[test]
    fn test_overlay_window_failure_is_fatal() {
        let mut overlay: Overlay<DummyPlatform> = Overlay::new(OverlayConfig::default(), || {
            let mut platform = DummyPlatform::new();
            platform.add_window(platform.root(), "GStreamer", TARGET);
            platform.set_fail_overlay_creation(true);
            Ok(platform)
        });
        assert!(matches!(
            overlay.try_initialize("GStreamer"),
            Err(OverlayError::ResourceCreationFailed { .. })
        ));
        assert!(!overlay.is_initialized());
    }

    #[test]
    fn test_no_fonts_is_fatal_and_leaks_nothing() {
        let mut overlay: Overlay<DummyPlatform> = Overlay::new(OverlayConfig::default(), || {
            let mut platform = DummyPlatform::new();
            platform.add_window(platform.root(), "GStreamer", TARGET);
            platform.set_fonts_available(false);
            Ok(platform)
        });
        assert!(matches!(overlay.try_initialize("GStreamer"), Err(OverlayError::Font { .. })));

        let platform = overlay.platform().unwrap();
        assert!(platform.overlay_windows().is_empty());
        assert_eq!(platform.live_buffers(), 0);
        assert_eq!(platform.stale_accesses(), 0);
    }

    #[test]
    fn test_lost_target_releases_everything() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        let target = target_of(&overlay);

        overlay.platform_mut().unwrap().remove_window(target);
        overlay.update_window_position();

        assert!(!overlay.is_initialized());
        assert_eq!(overlay.state().class_name(), Some("GStreamer"));
        let platform = overlay.platform().unwrap();
        assert!(platform.overlay_windows().is_empty());
        assert_eq!(platform.live_buffers(), 0);
        assert_eq!(platform.open_font_count(), 0);
        assert_eq!(overlay.renderer().metrics_cache().len(), 0);
    }

    #[test]
    fn test_reinitialize_notices_lost_target() {
        let mut overlay = overlay_with_target();
        assert!(overlay.try_initialize("GStreamer").unwrap());
        let target = target_of(&overlay);

        overlay.platform_mut().unwrap().remove_window(target);
        assert!(!overlay.try_initialize("GStreamer").unwrap());

        assert!(matches!(overlay.state(), OverlayState::Searching { .. }));
        assert!(!overlay.is_initialized());
        let platform = overlay.platform().unwrap();
        assert!(platform.overlay_windows().is_empty());
        assert_eq!(platform.live_buffers(), 0);
        assert_eq!(platform.stale_accesses(), 0);
    }

    #[test]
    fn test_reinitialize_same_class_keeps_session() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        let window = overlay.state().session().unwrap().overlay_window();

        assert!(overlay.try_initialize("GStreamer").unwrap());
        assert_eq!(overlay.platform().unwrap().overlay_windows(), &[window]);
    }

    #[test]
    fn test_no_drawing_after_target_lost() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        let target = target_of(&overlay);
        overlay.platform_mut().unwrap().remove_window(target);
        overlay.update_window_position();
        overlay.platform_mut().unwrap().clear_draw_calls();

        overlay.begin_frame();
        overlay.draw_string_plain("hello", 0, 0, Color::WHITE, Alignment::Left).unwrap();
        overlay.end_frame();

        let platform = overlay.platform().unwrap();
        assert!(platform.draw_calls().is_empty());
        assert_eq!(platform.stale_accesses(), 0);
        assert_eq!(overlay.text_size("hello").unwrap(), (0, 0));
    }

    #[test]
    fn test_resize_recreates_buffer() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        let old = overlay.frame_buffers().unwrap();
        let target = target_of(&overlay);

        overlay
            .platform_mut()
            .unwrap()
            .set_geometry(target, Geometry::new(120, 60, 800, 600));
        overlay.update_window_position();

        let new = overlay.frame_buffers().unwrap();
        assert_ne!(new.buffer, old.buffer);
        assert_eq!((new.width, new.height), (800, 600));
        let platform = overlay.platform().unwrap();
        assert_eq!(platform.buffer_size(new.buffer), Some((800, 600)));
        assert_eq!(platform.buffer_size(old.buffer), None);
        assert_eq!(platform.live_buffers(), 1);
    }

    #[test]
    fn test_move_keeps_buffer_and_follows_target() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        let frame = overlay.frame_buffers().unwrap();
        let target = target_of(&overlay);
        let moved = Geometry::new(300, 200, 640, 480);

        overlay.platform_mut().unwrap().set_geometry(target, moved);
        overlay.update_window_position();

        assert_eq!(overlay.frame_buffers(), Some(frame));
        let window = overlay.state().session().unwrap().overlay_window();
        assert_eq!(overlay.platform().unwrap().geometry_of(window), Some(moved));
    }

    #[test]
    fn test_buffer_failure_on_resize_demotes() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        let target = target_of(&overlay);

        let platform = overlay.platform_mut().unwrap();
        platform.set_geometry(target, Geometry::new(0, 0, 1024, 768));
        platform.set_fail_buffer_creation(true);
        overlay.update_window_position();

        assert!(!overlay.is_initialized());
        let platform = overlay.platform().unwrap();
        assert!(platform.overlay_windows().is_empty());
        assert_eq!(platform.live_buffers(), 0);
        assert_eq!(platform.stale_accesses(), 0);
    }

    #[test]
    fn test_frame_bracketing() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        let frame = overlay.frame_buffers().unwrap();
        let window = overlay.state().session().unwrap().overlay_window();
        let flushes = overlay.platform().unwrap().flush_count();

        overlay.begin_frame();
        overlay.draw_string_plain("Hi", 10, 10, Color::WHITE, Alignment::Left).unwrap();
        overlay.end_frame();

        let platform = overlay.platform().unwrap();
        let calls = platform.draw_calls();
        assert_eq!(calls.first(), Some(&DrawCall::Clear { buffer: frame.buffer }));
        assert!(matches!(calls[1], DrawCall::Text { .. }));
        assert_eq!(
            calls.last(),
            Some(&DrawCall::Present {
                buffer: frame.buffer,
                window
            })
        );
        assert_eq!(platform.flush_count(), flushes + 1);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();

        overlay.shutdown();
        assert!(matches!(overlay.state(), OverlayState::Uninitialized));
        assert!(overlay.platform().is_none());

        overlay.shutdown();
        assert!(matches!(overlay.state(), OverlayState::Uninitialized));
        assert_eq!((overlay.width(), overlay.height()), (0, 0));
    }

    #[test]
    fn test_poll_respects_retry_interval() {
        let mut overlay = Overlay::new(OverlayConfig::default().with_retry_interval_ms(60_000), || {
            Ok(DummyPlatform::new())
        });
        assert!(!overlay.poll().unwrap());

        let platform = overlay.platform_mut().unwrap();
        platform.add_window(platform.root(), "GStreamer", TARGET);
        assert!(!overlay.poll().unwrap());
        assert!(!overlay.is_initialized());
    }

    #[test]
    fn test_poll_rebinds_after_loss() {
        let mut overlay = empty_overlay();
        assert!(!overlay.poll().unwrap());

        let platform = overlay.platform_mut().unwrap();
        let target = platform.add_window(platform.root(), "GStreamer", TARGET);
        assert!(overlay.poll().unwrap());

        overlay.platform_mut().unwrap().remove_window(target);
        assert!(!overlay.poll().unwrap());

        let platform = overlay.platform_mut().unwrap();
        platform.add_window(platform.root(), "GStreamer", TARGET);
        assert!(overlay.poll().unwrap());
        assert_eq!(overlay.platform().unwrap().overlay_windows().len(), 1);
    }

    #[test]
    fn test_set_font_applies_to_next_draw() {
        let mut overlay = overlay_with_target();
        overlay.try_initialize("GStreamer").unwrap();
        overlay.set_font("DejaVu Sans", 30);
        overlay.draw_string_plain("abc", 0, 0, Color::WHITE, Alignment::Left).unwrap();

        let platform = overlay.platform().unwrap();
        let font = platform
            .draw_calls()
            .iter()
            .find_map(|call| match call {
                DrawCall::Text { font, .. } => Some(*font),
                _ => None,
            })
            .unwrap();
        assert_eq!(platform.font_family(font).as_deref(), Some("DejaVu Sans"));
        assert_eq!(platform.font_size(font), Some(30));
    }
}
