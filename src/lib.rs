//! HugOverlay - a transparent, click-through text overlay for X11
//!
//! This crate glues an always-on-top overlay to a foreign application
//! window (found by its `WM_CLASS`) and draws text on it with:
//! - Per-codepoint font fallback (emoji, symbols, CJK)
//! - Plain, outlined and boxed text styles with alignment
//! - Automatic recovery when the target window disappears

pub use overlay_core;
pub use overlay_x11;

// Re-export main types for convenience
pub use overlay_core::{
    Alignment, BackendError, Color, Overlay, OverlayConfig, OverlayError, OverlayResult, OverlayState,
};
pub use overlay_x11::{X11Error, X11Platform};

/// Overlay backed by the X server named by `$DISPLAY`
pub type X11Overlay = Overlay<X11Platform>;

/// Build an overlay that connects to X11 lazily on its first
/// initialization attempt
pub fn x11_overlay(config: OverlayConfig) -> X11Overlay {
    let dpi = config.dpi;
    Overlay::new(config, move || X11Platform::connect(dpi).map_err(BackendError::from))
}
