// src/constants.rs

/// Family used when the requested one cannot be matched
pub const DEFAULT_FONT_FAMILY: &str = "Consolas";
/// Point size used when none is requested
pub const DEFAULT_FONT_SIZE: u32 = 20;

/// Fallback families tried after the primary, in priority order.
/// Emoji and symbol coverage first, generic sans-serif last.
pub const DEFAULT_FALLBACK_FAMILIES: [&str; 9] = [
    "Noto Color Emoji",
    "Noto Emoji",
    "EmojiOne Color",
    "Twitter Color Emoji",
    "Segoe UI Symbol",
    "Symbola",
    "DejaVu Sans",
    "DejaVu Sans Mono",
    "Liberation Sans",
];

pub const DEFAULT_TARGET_CLASS: &str = "GStreamer";

pub const FRAME_INTERVAL_MS: u64 = 10;
pub const RETRY_INTERVAL_MS: u64 = 1000;

/// Bound on window-tree recursion
pub const MAX_SEARCH_DEPTH: usize = 64;
/// A search miss is reported at info level once every this many attempts
pub const SEARCH_STATUS_EVERY: u64 = 50;

pub const METRICS_CACHE_CAPACITY: usize = 1024;

pub const DEFAULT_DPI: f32 = 96.0;

pub const DEFAULT_OUTLINE_WIDTH: i32 = 2;
pub const DEFAULT_PADDING: i32 = 6;

/// 8-neighbourhood used by the outline halo, in drawing order
pub const OUTLINE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
