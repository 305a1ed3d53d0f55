#![no_main]
use libfuzzer_sys::fuzz_target;
use hugoverlay::overlay_core::{shape, DummyPlatform, FontRequest, FontResolver};

fuzz_target!(|data: &[u8]| {
    let mut platform = DummyPlatform::new();
    let mut resolver = FontResolver::new(
        FontRequest::default(),
        vec!["Noto Color Emoji".to_string(), "DejaVu Sans".to_string()],
    );
    let Ok(set) = resolver.resolve(&mut platform, &FontRequest::default()) else {
        return;
    };
    let metrics = shape(&platform, set, data);

    // Every decoded code point lands in exactly one run
    let glyphs: usize = metrics
        .runs
        .iter()
        .filter(|run| !run.is_line_break())
        .map(|run| run.text.chars().count())
        .sum();
    let breaks = metrics.runs.iter().filter(|run| run.is_line_break()).count();
    assert!(glyphs + breaks <= data.len());
    assert_eq!(metrics.advances.len(), metrics.runs.len());
    if !data.is_empty() {
        assert_eq!(metrics.line_widths.len(), breaks + 1);
    }
});
