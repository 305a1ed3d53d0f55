//! Per-codepoint font selection along a fallback chain

use crate::font::FontSet;
use crate::traits::{FontId, FontSystem};

/// Pick the font that should render `ch`.
///
/// The primary font wins if it has the glyph, then the first fallback in
/// list order that has it. With no coverage anywhere the primary is used
/// and renders its missing-glyph box.
pub fn pick_font<F: FontSystem + ?Sized>(fonts: &F, set: &FontSet, ch: char) -> FontId {
    set.fonts()
        .find(|&font| fonts.has_glyph(font, ch))
        .unwrap_or_else(|| set.primary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_backend::DummyPlatform;
    use crate::font::{FontRequest, FontResolver};

    fn font_set(platform: &mut DummyPlatform) -> FontSet {
        let mut resolver = FontResolver::new(
            FontRequest::default(),
            vec!["Noto Color Emoji".to_string(), "DejaVu Sans".to_string()],
        );
        resolver
            .resolve(platform, &FontRequest::new("Consolas", 20))
            .unwrap()
            .clone()
    }

    #[test]
    fn test_primary_font_preferred() {
        let mut platform = DummyPlatform::new();
        let set = font_set(&mut platform);
        assert_eq!(pick_font(&platform, &set, 'A'), set.primary());
    }

    #[test]
    fn test_fallbacks_in_priority_order() {
        let mut platform = DummyPlatform::new();
        let set = font_set(&mut platform);

        assert_eq!(pick_font(&platform, &set, '🔋'), set.fallbacks()[0]);
        // Arrows are only in DejaVu Sans
        assert_eq!(pick_font(&platform, &set, '↕'), set.fallbacks()[1]);
    }

    #[test]
    fn test_uncovered_char_uses_primary() {
        let mut platform = DummyPlatform::new();
        let set = font_set(&mut platform);
        assert_eq!(pick_font(&platform, &set, '\u{E000}'), set.primary());
    }
}
