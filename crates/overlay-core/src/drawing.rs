// src/drawing.rs
//! Styled text rendering into an off-screen buffer.

use tracing::debug;

use crate::color::Color;
use crate::config::OverlayConfig;
use crate::constants::OUTLINE_OFFSETS;
use crate::font::{FontRequest, FontResolver, FontSelectionError, FontSet};
use crate::text::{MetricsCache, TextMetrics};
use crate::traits::{BufferId, DrawingSurface, FontSystem, Rect};

/// Horizontal anchoring of each line relative to the x coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Pen start for a line of `width` pixels anchored at `x`
    pub fn line_start(self, x: i32, width: i32) -> i32 {
        match self {
            Alignment::Left => x,
            Alignment::Center => x - width / 2,
            Alignment::Right => x - width,
        }
    }
}

/// Font state plus the three text styles.
///
/// Owns the font-set cache and the metrics cache so that changing the
/// active font always invalidates metrics in the same place.
pub struct TextRenderer {
    default_request: FontRequest,
    active: FontRequest,
    resolver: FontResolver,
    metrics: MetricsCache,
}

impl TextRenderer {
    pub fn new(config: &OverlayConfig) -> Self {
        let default_request = FontRequest::default();
        let active = config.font_request().or_defaults(&default_request);
        Self {
            resolver: FontResolver::new(default_request.clone(), config.fallback_families.clone()),
            metrics: MetricsCache::new(config.metrics_cache_capacity),
            default_request,
            active,
        }
    }

    pub fn active_font(&self) -> &FontRequest {
        &self.active
    }

    /// Switch the active font. Returns true if it changed, in which case
    /// every cached metric has been dropped.
    pub fn set_font(&mut self, family: &str, size_pt: u32) -> bool {
        let request = FontRequest::new(family, size_pt).or_defaults(&self.default_request);
        if request == self.active {
            return false;
        }
        debug!("Active font {} {}pt -> {} {}pt", self.active.family, self.active.size_pt, request.family, request.size_pt);
        self.active = request;
        self.metrics.invalidate_all();
        true
    }

    /// Open (or fetch) the active font set
    pub fn load_font_set<F: FontSystem + ?Sized>(&mut self, fonts: &mut F) -> Result<&FontSet, FontSelectionError> {
        self.resolver.resolve(fonts, &self.active)
    }

    pub fn metrics_cache(&self) -> &MetricsCache {
        &self.metrics
    }

    pub fn font_resolver(&self) -> &FontResolver {
        &self.resolver
    }

    /// Close every font and drop every cached metric
    pub fn release<F: FontSystem + ?Sized>(&mut self, fonts: &mut F) {
        self.resolver.release_all(fonts);
        self.metrics.invalidate_all();
    }

    fn prepare<F: FontSystem + ?Sized>(
        &mut self,
        fonts: &mut F,
        text: &[u8],
    ) -> Result<(&FontSet, &TextMetrics), FontSelectionError> {
        let set = self.resolver.resolve(fonts, &self.active)?;
        let metrics = self.metrics.get_or_compute(&*fonts, set, text);
        Ok((set, metrics))
    }

    /// Width and height of `text` in the active font
    pub fn text_size<F: FontSystem + ?Sized>(&mut self, fonts: &mut F, text: &[u8]) -> Result<(i32, i32), FontSelectionError> {
        if text.is_empty() {
            return Ok((0, 0));
        }
        let (_, metrics) = self.prepare(fonts, text)?;
        Ok((metrics.width, metrics.height))
    }

    /// Solid text with its top edge at `y`
    #[allow(clippy::too_many_arguments)]
    pub fn draw_plain<P: FontSystem + DrawingSurface + ?Sized>(
        &mut self,
        platform: &mut P,
        buffer: BufferId,
        text: &[u8],
        x: i32,
        y: i32,
        color: Color,
        align: Alignment,
    ) -> Result<(), FontSelectionError> {
        if text.is_empty() {
            return Ok(());
        }
        let (set, metrics) = self.prepare(platform, text)?;
        draw_runs(platform, buffer, set, metrics, x, y, color, align);
        Ok(())
    }

    /// Text over an 8-direction halo offset by `outline_width` pixels
    #[allow(clippy::too_many_arguments)]
    pub fn draw_outline<P: FontSystem + DrawingSurface + ?Sized>(
        &mut self,
        platform: &mut P,
        buffer: BufferId,
        text: &[u8],
        x: i32,
        y: i32,
        color: Color,
        outline_color: Color,
        outline_width: i32,
        align: Alignment,
    ) -> Result<(), FontSelectionError> {
        if text.is_empty() {
            return Ok(());
        }
        let thickness = outline_width.max(1);
        let (set, metrics) = self.prepare(platform, text)?;
        for (dx, dy) in OUTLINE_OFFSETS {
            draw_runs(platform, buffer, set, metrics, x + dx * thickness, y + dy * thickness, outline_color, align);
        }
        draw_runs(platform, buffer, set, metrics, x, y, color, align);
        Ok(())
    }

    /// Text inside a filled box extending `padding` pixels on every side.
    ///
    /// The text is anchored at `(x, y)` exactly as in [`Self::draw_plain`];
    /// the box grows outward from the aligned text block.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_background<P: FontSystem + DrawingSurface + ?Sized>(
        &mut self,
        platform: &mut P,
        buffer: BufferId,
        text: &[u8],
        x: i32,
        y: i32,
        color: Color,
        background: Color,
        padding: i32,
        align: Alignment,
    ) -> Result<(), FontSelectionError> {
        if text.is_empty() {
            return Ok(());
        }
        let padding = padding.max(0);
        let (set, metrics) = self.prepare(platform, text)?;

        let rect = Rect {
            x: align.line_start(x, metrics.width) - padding,
            y: y - padding,
            width: metrics.width + 2 * padding,
            height: metrics.height + 2 * padding,
        };
        platform.fill_rect(buffer, rect, background);
        draw_runs(platform, buffer, set, metrics, x, y, color, align);
        Ok(())
    }
}

/// Walk the runs left to right, one baseline per line
#[allow(clippy::too_many_arguments)]
fn draw_runs<P: DrawingSurface + ?Sized>(
    platform: &mut P,
    buffer: BufferId,
    set: &FontSet,
    metrics: &TextMetrics,
    x: i32,
    y: i32,
    color: Color,
    align: Alignment,
) {
    let line_start = |line: usize| align.line_start(x, metrics.line_widths.get(line).copied().unwrap_or(0));

    let mut line = 0;
    let mut pen = line_start(line);
    let mut baseline = y + set.line_ascent();

    for (run, &advance) in metrics.runs.iter().zip(&metrics.advances) {
        match run.font {
            Some(font) => {
                platform.draw_text(buffer, font, pen, baseline, &run.text, color);
                pen += advance;
            }
            None => {
                line += 1;
                baseline += set.line_height();
                pen = line_start(line);
            }
        }
    }
}
