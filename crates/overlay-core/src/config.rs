// src/config.rs
use crate::constants::{
    DEFAULT_DPI, DEFAULT_FALLBACK_FAMILIES, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    DEFAULT_TARGET_CLASS, FRAME_INTERVAL_MS, MAX_SEARCH_DEPTH, METRICS_CACHE_CAPACITY,
    RETRY_INTERVAL_MS,
};
use crate::font::FontRequest;

#[derive(Clone, Debug)]
pub struct OverlayConfig {
    /// `WM_CLASS` class of the window to track
    pub target_class: String,
    pub font_family: String,
    pub font_size: u32,
    /// Tried in order after the primary font
    pub fallback_families: Vec<String>,
    pub frame_interval_ms: u64,
    pub retry_interval_ms: u64,
    pub max_search_depth: usize,
    /// Entries kept before the metrics cache is flushed
    pub metrics_cache_capacity: usize,
    pub dpi: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            target_class: DEFAULT_TARGET_CLASS.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            fallback_families: DEFAULT_FALLBACK_FAMILIES
                .iter()
                .map(|f| f.to_string())
                .collect(),
            frame_interval_ms: FRAME_INTERVAL_MS,
            retry_interval_ms: RETRY_INTERVAL_MS,
            max_search_depth: MAX_SEARCH_DEPTH,
            metrics_cache_capacity: METRICS_CACHE_CAPACITY,
            dpi: DEFAULT_DPI,
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_class(mut self, class_name: &str) -> Self {
        self.target_class = class_name.to_string();
        self
    }

    pub fn with_font(mut self, family: &str, size: u32) -> Self {
        self.font_family = family.to_string();
        self.font_size = size;
        self
    }

    pub fn with_fallback_families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_families = families.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_frame_interval_ms(mut self, ms: u64) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    pub fn with_retry_interval_ms(mut self, ms: u64) -> Self {
        self.retry_interval_ms = ms;
        self
    }

    pub fn with_max_search_depth(mut self, depth: usize) -> Self {
        self.max_search_depth = depth.max(1);
        self
    }

    pub fn with_metrics_cache_capacity(mut self, capacity: usize) -> Self {
        self.metrics_cache_capacity = capacity.max(1);
        self
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = if dpi > 0.0 { dpi } else { DEFAULT_DPI };
        self
    }

    /// The font request drawing starts with
    pub fn font_request(&self) -> FontRequest {
        FontRequest::new(&self.font_family, self.font_size)
    }
}
