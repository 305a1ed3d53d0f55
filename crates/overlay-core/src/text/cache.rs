//! Memoized shaping results for the active font set.
//!
//! Entries are keyed by text only. Every code path that changes the active
//! font request must call [`MetricsCache::invalidate_all`] before the next
//! lookup, because cached runs hold font handles of the old set.

use std::collections::HashMap;

use tracing::trace;

use crate::constants::METRICS_CACHE_CAPACITY;
use crate::font::FontSet;
use crate::text::shaper::{shape, TextMetrics};
use crate::traits::FontSystem;

pub struct MetricsCache {
    entries: HashMap<Vec<u8>, TextMetrics>,
    capacity: usize,
}

impl Default for MetricsCache {
    fn default() -> Self {
        Self::new(METRICS_CACHE_CAPACITY)
    }
}

impl MetricsCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Cached metrics for `text`, shaping against `set` on a miss.
    ///
    /// A full cache is flushed before the new entry goes in.
    pub fn get_or_compute<F: FontSystem + ?Sized>(
        &mut self,
        fonts: &F,
        set: &FontSet,
        text: &[u8],
    ) -> &TextMetrics {
        if !self.entries.contains_key(text) {
            if self.entries.len() >= self.capacity {
                trace!("Metrics cache full ({} entries), flushing", self.entries.len());
                self.entries.clear();
            }
            self.entries.insert(text.to_vec(), shape(fonts, set, text));
        }
        &self.entries[text]
    }

    pub fn get(&self, text: &[u8]) -> Option<&TextMetrics> {
        self.entries.get(text)
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_backend::DummyPlatform;
    use crate::font::{FontRequest, FontResolver};

    fn resolver() -> FontResolver {
        FontResolver::new(FontRequest::default(), vec!["Noto Color Emoji".to_string()])
    }

    #[test]
    fn test_hit_returns_stored_entry() {
        let mut platform = DummyPlatform::new();
        let mut resolver = resolver();
        let set = resolver
            .resolve(&mut platform, &FontRequest::new("Consolas", 20))
            .unwrap()
            .clone();
        let mut cache = MetricsCache::default();

        let first = cache.get_or_compute(&platform, &set, b"hello").clone();
        let measured = platform.advance_queries();
        let second = cache.get_or_compute(&platform, &set, b"hello").clone();

        assert_eq!(first, second);
        assert_eq!(platform.advance_queries(), measured);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_picks_up_new_font_set() {
        let mut platform = DummyPlatform::new();
        let mut resolver = resolver();
        let small = resolver
            .resolve(&mut platform, &FontRequest::new("Consolas", 20))
            .unwrap()
            .clone();
        let large = resolver
            .resolve(&mut platform, &FontRequest::new("DejaVu Sans", 30))
            .unwrap()
            .clone();
        let mut cache = MetricsCache::default();

        let before = cache.get_or_compute(&platform, &small, b"text").clone();
        cache.invalidate_all();
        let after = cache.get_or_compute(&platform, &large, b"text").clone();

        assert_ne!(before.runs[0].font, after.runs[0].font);
        assert_eq!(after.runs[0].font, Some(large.primary()));
        assert!(after.width > before.width);
    }

    #[test]
    fn test_full_cache_is_flushed() {
        let mut platform = DummyPlatform::new();
        let mut resolver = resolver();
        let set = resolver
            .resolve(&mut platform, &FontRequest::new("Consolas", 20))
            .unwrap()
            .clone();
        let mut cache = MetricsCache::new(2);

        cache.get_or_compute(&platform, &set, b"1 ms");
        cache.get_or_compute(&platform, &set, b"2 ms");
        assert_eq!(cache.len(), 2);

        cache.get_or_compute(&platform, &set, b"3 ms");
        assert_eq!(cache.len(), 1);
        assert!(cache.get(b"3 ms").is_some());
    }
}
