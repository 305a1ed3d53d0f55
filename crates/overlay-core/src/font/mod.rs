//! Font resolution with fallback chains
//!
//! A [`FontSet`] pairs the requested primary font with an ordered list of
//! fallback fonts so that emoji and symbols outside the primary font's
//! coverage still render. [`FontResolver`] caches sets per [`FontRequest`].

pub mod cache;
pub mod fallback;

pub use cache::{FontRequest, FontResolver, FontSelectionError, FontSet};
pub use fallback::pick_font;
