//! Overlay Core - platform-agnostic text overlay engine
//!
//! This crate tracks a foreign application window, keeps a transparent
//! click-through overlay glued to it, and renders multi-script text with
//! per-codepoint font fallback. Windowing, font matching and pixel buffers
//! are consumed through the traits in [`traits`].

pub mod color;
pub mod config;
pub mod constants;
pub mod drawing;
pub mod dummy_backend;
pub mod error;
pub mod font;
pub mod overlay;
pub mod search;
pub mod text;
pub mod traits;

// Re-export main types
pub use color::Color;
pub use config::OverlayConfig;
pub use drawing::{Alignment, TextRenderer};
pub use dummy_backend::{DrawCall, DummyFont, DummyPlatform};
pub use error::{OverlayError, OverlayResult};
pub use font::{pick_font, FontRequest, FontResolver, FontSelectionError, FontSet};
pub use overlay::{Connector, FrameBuffers, Overlay, OverlayState, Session};
pub use search::find_window_by_class;
pub use text::{shape, MetricsCache, Run, TextMetrics};

// Re-export traits and types
pub use traits::*;
