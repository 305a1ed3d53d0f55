//! Font matching through fontconfig, glyph work through fontdue

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use cairo::{Format, ImageSurface};
use fontconfig::Fontconfig;
use fontdue::{Font, FontSettings};
use overlay_core::{FontId, LineMetrics};
use tracing::{debug, warn};

use crate::error::X11Error;

/// Convert a point size to pixels at `dpi`
pub fn points_to_pixels(size_pt: u32, dpi: f32) -> f32 {
    size_pt as f32 * dpi / 72.0
}

/// A rasterized glyph ready to be used as a cairo mask
pub struct Glyph {
    /// `None` for glyphs with no ink, such as spaces
    pub mask: Option<ImageSurface>,
    /// Offset of the mask's left edge from the pen
    pub left: i32,
    /// Offset of the mask's top edge from the baseline (negative is up)
    pub top: i32,
    pub advance: f32,
}

struct OpenFont {
    face: Rc<Font>,
    px: f32,
}

/// Opened fonts plus a per-font glyph image cache
pub struct FontStore {
    fontconfig: Fontconfig,
    dpi: f32,
    faces: HashMap<(PathBuf, u32), Rc<Font>>,
    open: HashMap<FontId, OpenFont>,
    glyphs: HashMap<(FontId, char), Glyph>,
    next_id: u32,
}

impl FontStore {
    pub fn new(dpi: f32) -> Result<Self, X11Error> {
        let fontconfig = Fontconfig::new().ok_or_else(|| X11Error::FontSystem {
            message: "fontconfig could not be initialised".to_string(),
        })?;
        Ok(Self {
            fontconfig,
            dpi,
            faces: HashMap::new(),
            open: HashMap::new(),
            glyphs: HashMap::new(),
            next_id: 1,
        })
    }

    /// Match `family` and load it at `size_pt`.
    ///
    /// fontconfig always returns its best substitute; a substitute from a
    /// different family counts as no match so the caller's own fallback
    /// order decides what is used instead.
    pub fn open(&mut self, family: &str, size_pt: u32) -> Option<FontId> {
        let matched = self.fontconfig.find(family, None)?;
        if !matched.name.to_lowercase().starts_with(&family.to_lowercase()) {
            debug!("Font '{}' not installed (fontconfig offered '{}')", family, matched.name);
            return None;
        }

        let index = matched.index.unwrap_or(0).max(0) as u32;
        let key = (matched.path.clone(), index);
        let face = match self.faces.get(&key) {
            Some(face) => Rc::clone(face),
            None => {
                let face = Rc::new(load_face(&matched.path, index)?);
                self.faces.insert(key, Rc::clone(&face));
                face
            }
        };

        let id = FontId(self.next_id);
        self.next_id += 1;
        let px = points_to_pixels(size_pt, self.dpi);
        debug!("Opened {} {}pt ({}px) from {}", family, size_pt, px, matched.path.display());
        self.open.insert(id, OpenFont { face, px });
        Some(id)
    }

    pub fn close(&mut self, font: FontId) {
        if self.open.remove(&font).is_none() {
            warn!("Closing unknown font {:?}", font);
            return;
        }
        self.glyphs.retain(|(owner, _), _| *owner != font);
        self.faces.retain(|_, face| Rc::strong_count(face) > 1);
    }

    pub fn has_glyph(&self, font: FontId, ch: char) -> bool {
        self.open
            .get(&font)
            .is_some_and(|f| f.face.lookup_glyph_index(ch) != 0)
    }

    pub fn line_metrics(&self, font: FontId) -> LineMetrics {
        self.open
            .get(&font)
            .and_then(|f| f.face.horizontal_line_metrics(f.px))
            .map(|m| LineMetrics {
                ascent: m.ascent.ceil() as i32,
                descent: (-m.descent).ceil() as i32,
            })
            .unwrap_or_default()
    }

    pub fn text_advance(&self, font: FontId, text: &str) -> i32 {
        let Some(open) = self.open.get(&font) else {
            return 0;
        };
        text.chars()
            .map(|ch| open.face.metrics(ch, open.px).advance_width)
            .sum::<f32>()
            .round() as i32
    }

    /// Rasterized glyph, cached until its font is closed
    pub fn glyph(&mut self, font: FontId, ch: char) -> Option<&Glyph> {
        let open = self.open.get(&font)?;
        Some(
            self.glyphs
                .entry((font, ch))
                .or_insert_with(|| rasterize(&open.face, ch, open.px)),
        )
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

fn load_face(path: &std::path::Path, index: u32) -> Option<Font> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to read font file {}: {}", path.display(), e);
            return None;
        }
    };
    let settings = FontSettings {
        collection_index: index,
        ..Default::default()
    };
    match Font::from_bytes(data, settings) {
        Ok(face) => Some(face),
        Err(e) => {
            warn!("Failed to parse font {}: {}", path.display(), e);
            None
        }
    }
}

fn rasterize(face: &Font, ch: char, px: f32) -> Glyph {
    let (metrics, coverage) = face.rasterize(ch, px);
    let mask = if metrics.width == 0 || metrics.height == 0 {
        None
    } else {
        mask_surface(&coverage, metrics.width, metrics.height)
    };
    Glyph {
        mask,
        left: metrics.xmin,
        top: -(metrics.ymin + metrics.height as i32),
        advance: metrics.advance_width,
    }
}

/// Pack a coverage bitmap into an A8 surface with cairo's row stride
fn mask_surface(coverage: &[u8], width: usize, height: usize) -> Option<ImageSurface> {
    let stride = Format::A8.stride_for_width(width as u32).ok()?;
    let data = pad_rows(coverage, width, height, stride as usize);
    match ImageSurface::create_for_data(data, Format::A8, width as i32, height as i32, stride) {
        Ok(surface) => Some(surface),
        Err(e) => {
            warn!("Failed to build glyph mask: {}", e);
            None
        }
    }
}

fn pad_rows(coverage: &[u8], width: usize, height: usize, stride: usize) -> Vec<u8> {
    let mut data = vec![0u8; stride * height];
    for (row, src) in coverage.chunks(width).take(height).enumerate() {
        data[row * stride..row * stride + src.len()].copy_from_slice(src);
    }
    data
}
