// src/main.rs
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use hugoverlay::overlay_core::constants::{DEFAULT_OUTLINE_WIDTH, DEFAULT_PADDING};
use hugoverlay::{x11_overlay, Alignment, Color, OverlayConfig, OverlayResult, X11Overlay};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TIME_BACKGROUND: Color = Color::rgba(0.0, 0.0, 0.0, 0.6);
const EMOJI_TEXT: &str = "🔋↕️🧭\n🛰️⏱🏠";
const CENTER_TEXT: &str = "HALO\nJA MILUJEM FICA\nTO TAM ALE MUSITE POVEDAT";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = OverlayConfig::default();
    if let Some(class_name) = std::env::args().nth(1) {
        config = config.with_target_class(&class_name);
    }
    let frame_interval = Duration::from_millis(config.frame_interval_ms);
    info!("Waiting for a window of class '{}'", config.target_class);

    let mut overlay = x11_overlay(config);
    let start = Instant::now();

    loop {
        let drawable = overlay.poll().context("overlay cannot run")?;
        if drawable {
            overlay.begin_frame();
            draw_frame(&mut overlay, start.elapsed()).context("failed to draw frame")?;
            overlay.end_frame();
        }
        thread::sleep(frame_interval);
    }
}

/// Each label uses its own font and every `set_font` change drops the
/// metrics cache, so all labels are re-shaped on every frame.
fn draw_frame(overlay: &mut X11Overlay, elapsed: Duration) -> OverlayResult<()> {
    let width = overlay.width() as i32;
    let height = overlay.height() as i32;

    // Top-left: elapsed time in the default font
    overlay.set_font("", 0);
    let time_text = format!("{} ms", elapsed.as_millis());
    overlay.draw_string_background(&time_text, 10, 10, Color::WHITE, TIME_BACKGROUND, DEFAULT_PADDING, Alignment::Left)?;

    // Top-right: emoji with an outline
    overlay.set_font("Arial", 24);
    overlay.draw_string_outline(
        EMOJI_TEXT,
        width - 10,
        10,
        Color::rgb(0.0, 1.0, 1.0),
        Color::BLACK,
        DEFAULT_OUTLINE_WIDTH,
        Alignment::Right,
    )?;

    // Middle: multi-line block
    overlay.set_font("Times New Roman", 36);
    let (_, text_height) = overlay.text_size(CENTER_TEXT)?;
    overlay.draw_string_plain(
        CENTER_TEXT,
        width / 2 - 10,
        (height - text_height) / 2,
        Color::rgb(1.0, 0.5, 0.0),
        Alignment::Right,
    )?;

    // Bottom-left
    overlay.set_font("Courier New", 18);
    let fps_text = "FPS: 60";
    let (_, text_height) = overlay.text_size(fps_text)?;
    overlay.draw_string_background(
        fps_text,
        10,
        height - text_height - 10,
        Color::rgb(0.0, 1.0, 0.0),
        TIME_BACKGROUND,
        DEFAULT_PADDING,
        Alignment::Left,
    )?;

    // Bottom-right: default family, larger size
    overlay.set_font("", 30);
    let status_text = "Active";
    let (_, text_height) = overlay.text_size(status_text)?;
    overlay.draw_string_plain(
        status_text,
        width - 10,
        height - text_height - 10,
        Color::rgb(0.8, 0.8, 1.0),
        Alignment::Right,
    )?;

    Ok(())
}
