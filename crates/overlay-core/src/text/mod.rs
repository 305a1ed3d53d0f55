//! Text shaping into font runs and memoized text metrics

pub mod cache;
pub mod shaper;
pub mod utf8;

pub use cache::MetricsCache;
pub use shaper::{shape, Run, TextMetrics};
pub use utf8::Utf8Decoder;
