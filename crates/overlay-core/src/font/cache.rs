//! Font-set cache keyed by family and point size

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::constants::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::traits::{FontId, FontSystem};

/// Font selection error types
#[derive(Debug, thiserror::Error)]
pub enum FontSelectionError {
    #[error("No fonts available for {family} {size_pt}pt")]
    NoFontsAvailable { family: String, size_pt: u32 },
}

/// Identity of a font set: two equal requests share one cached set
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontRequest {
    pub family: String,
    pub size_pt: u32,
}

impl FontRequest {
    pub fn new(family: &str, size_pt: u32) -> Self {
        Self {
            family: family.to_string(),
            size_pt,
        }
    }

    /// Replace an empty family or a zero size with the given defaults
    pub fn or_defaults(self, defaults: &FontRequest) -> Self {
        let family = if self.family.trim().is_empty() {
            defaults.family.clone()
        } else {
            self.family
        };
        let size_pt = if self.size_pt == 0 { defaults.size_pt } else { self.size_pt };
        Self { family, size_pt }
    }
}

impl Default for FontRequest {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE)
    }
}

/// Primary font plus ordered fallbacks sharing one point size.
///
/// Line metrics are the maxima over every font that actually opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSet {
    primary: FontId,
    fallbacks: Vec<FontId>,
    line_ascent: i32,
    line_descent: i32,
}

impl FontSet {
    pub fn new<F: FontSystem + ?Sized>(fonts: &F, primary: FontId, fallbacks: Vec<FontId>) -> Self {
        let (line_ascent, line_descent) = std::iter::once(&primary)
            .chain(fallbacks.iter())
            .map(|&id| fonts.line_metrics(id))
            .fold((0, 0), |(a, d), m| (a.max(m.ascent), d.max(m.descent)));

        Self {
            primary,
            fallbacks,
            line_ascent,
            line_descent,
        }
    }

    pub fn primary(&self) -> FontId {
        self.primary
    }

    pub fn fallbacks(&self) -> &[FontId] {
        &self.fallbacks
    }

    pub fn line_ascent(&self) -> i32 {
        self.line_ascent
    }

    pub fn line_descent(&self) -> i32 {
        self.line_descent
    }

    pub fn line_height(&self) -> i32 {
        self.line_ascent + self.line_descent
    }

    /// Every handle owned by this set, primary first
    pub fn fonts(&self) -> impl Iterator<Item = FontId> + '_ {
        std::iter::once(self.primary).chain(self.fallbacks.iter().copied())
    }
}

/// Cache of opened font sets.
///
/// Owns every font handle it opens and is the only place they are closed.
pub struct FontResolver {
    default_request: FontRequest,
    fallback_families: Vec<String>,
    sets: HashMap<FontRequest, FontSet>,
}

impl FontResolver {
    pub fn new(default_request: FontRequest, fallback_families: Vec<String>) -> Self {
        Self {
            default_request,
            fallback_families,
            sets: HashMap::new(),
        }
    }

    /// Return the cached set for `request`, opening it on first use.
    ///
    /// An unmatched family falls back to the default request. Only when not
    /// a single font can be opened is this an error.
    pub fn resolve<F: FontSystem + ?Sized>(
        &mut self,
        fonts: &mut F,
        request: &FontRequest,
    ) -> Result<&FontSet, FontSelectionError> {
        if !self.sets.contains_key(request) {
            let set = self.open_set(fonts, request)?;
            self.sets.insert(request.clone(), set);
        }
        self.sets
            .get(request)
            .ok_or_else(|| FontSelectionError::NoFontsAvailable {
                family: request.family.clone(),
                size_pt: request.size_pt,
            })
    }

    fn open_set<F: FontSystem + ?Sized>(
        &self,
        fonts: &mut F,
        request: &FontRequest,
    ) -> Result<FontSet, FontSelectionError> {
        let mut primary = fonts.open_font(&request.family, request.size_pt);
        if primary.is_none() {
            warn!(
                "Failed to load primary font {} {}pt, using {} {}pt",
                request.family, request.size_pt, self.default_request.family, self.default_request.size_pt
            );
            primary = fonts.open_font(&self.default_request.family, self.default_request.size_pt);
        }

        let mut fallbacks: Vec<FontId> = self
            .fallback_families
            .iter()
            .filter_map(|family| {
                let font = fonts.open_font(family, request.size_pt);
                if font.is_none() {
                    debug!("Fallback font {} unavailable", family);
                }
                font
            })
            .collect();

        // Without the default either, promote the first fallback
        let primary = match primary {
            Some(font) => font,
            None if !fallbacks.is_empty() => fallbacks.remove(0),
            None => {
                return Err(FontSelectionError::NoFontsAvailable {
                    family: request.family.clone(),
                    size_pt: request.size_pt,
                })
            }
        };

        let set = FontSet::new(&*fonts, primary, fallbacks);
        debug!(
            "Opened font set {} {}pt: {} fallbacks, line height {}",
            request.family,
            request.size_pt,
            set.fallbacks().len(),
            set.line_height()
        );
        Ok(set)
    }

    pub fn get(&self, request: &FontRequest) -> Option<&FontSet> {
        self.sets.get(request)
    }

    /// Number of cached font sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Close every cached font and empty the cache
    pub fn release_all<F: FontSystem + ?Sized>(&mut self, fonts: &mut F) {
        for (_, set) in self.sets.drain() {
            for font in set.fonts() {
                fonts.close_font(font);
            }
        }
    }
}
