//! Overlay X11 - X11 backend for overlay-core
//!
//! Implements the overlay-core platform traits on top of a plain X11
//! connection: `x11rb` for the window tree and the ARGB overlay window,
//! `cairo-rs` image surfaces as off-screen buffers, `fontconfig` for font
//! matching and `fontdue` for coverage, measurement and rasterization.

mod error;
mod fonts;
mod platform;
mod surface;

pub use error::X11Error;
pub use fonts::{points_to_pixels, FontStore, Glyph};
pub use platform::X11Platform;

// Re-export overlay-core types for convenience
pub use overlay_core::*;
