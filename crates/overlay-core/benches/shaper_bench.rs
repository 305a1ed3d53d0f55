use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use overlay_core::{
    shape, Alignment, Color, DrawingSurface, DummyPlatform, FontRequest, FontResolver, FontSet, Geometry,
    MetricsCache, OverlayConfig, TextRenderer,
};

fn font_set(platform: &mut DummyPlatform) -> FontSet {
    let mut resolver = FontResolver::new(
        FontRequest::default(),
        vec!["Noto Color Emoji".to_string(), "DejaVu Sans".to_string()],
    );
    resolver
        .resolve(platform, &FontRequest::default())
        .map(Clone::clone)
        .unwrap_or_else(|e| panic!("bench fonts: {}", e))
}

fn bench_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_plain");
    let mut platform = DummyPlatform::new();
    let set = font_set(&mut platform);

    for size in [10, 100, 1000] {
        let text = "a".repeat(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| shape(&platform, &set, black_box(text.as_bytes())));
        });
    }
    group.finish();
}

fn bench_mixed_scripts(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_mixed");
    let mut platform = DummyPlatform::new();
    let set = font_set(&mut platform);

    let patterns = vec![
        ("emoji", "🔋↕️🧭\n🛰️⏱🏠"),
        ("latin_symbols", "Temp: 21°C ↑ 3% → ok"),
        ("multiline", "HALO\nJA MILUJEM FICA\nTO TAM ALE MUSITE POVEDAT"),
    ];

    for (name, pattern) in patterns {
        let text = pattern.repeat(20);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| shape(&platform, &set, black_box(text.as_bytes())));
        });
    }
    group.finish();
}

fn bench_malformed(c: &mut Criterion) {
    let mut platform = DummyPlatform::new();
    let set = font_set(&mut platform);
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    c.bench_function("shape_malformed_4k", |b| {
        b.iter(|| shape(&platform, &set, black_box(&bytes)));
    });
}

fn bench_metrics_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics_cache");
    let mut platform = DummyPlatform::new();
    let set = font_set(&mut platform);
    let text = "FPS: 60 🔋".as_bytes();

    group.bench_function("hit", |b| {
        let mut cache = MetricsCache::default();
        cache.get_or_compute(&platform, &set, text);
        b.iter(|| cache.get_or_compute(&platform, &set, black_box(text)).width);
    });

    // A changing timer string is a miss every frame
    group.bench_function("miss", |b| {
        let mut cache = MetricsCache::default();
        let mut frame = 0u64;
        b.iter(|| {
            frame += 1;
            let text = format!("{} ms", frame);
            cache.get_or_compute(&platform, &set, text.as_bytes()).width
        });
    });
    group.finish();
}

fn bench_outline_draw(c: &mut Criterion) {
    let mut platform = DummyPlatform::new();
    let window = platform.add_window(platform.root(), "Bench", Geometry::new(0, 0, 800, 600));
    let buffer = platform
        .create_buffer(window, 800, 600)
        .unwrap_or_else(|e| panic!("bench buffer: {}", e));
    let mut renderer = TextRenderer::new(&OverlayConfig::default());

    c.bench_function("draw_outline_emoji", |b| {
        b.iter(|| {
            platform.clear_draw_calls();
            renderer
                .draw_outline(
                    &mut platform,
                    buffer,
                    black_box("🔋↕️🧭\n🛰️⏱🏠".as_bytes()),
                    790,
                    10,
                    Color::WHITE,
                    Color::BLACK,
                    2,
                    Alignment::Right,
                )
                .unwrap_or_else(|e| panic!("bench draw: {}", e));
        });
    });
}

criterion_group!(
    benches,
    bench_plain_text,
    bench_mixed_scripts,
    bench_malformed,
    bench_metrics_cache,
    bench_outline_draw
);
criterion_main!(benches);
