//! Splits text into runs that share one font and measures them.

use crate::font::{pick_font, FontSet};
use crate::text::utf8::Utf8Decoder;
use crate::traits::{FontId, FontSystem};

/// Payload of a line-break run
const LINE_BREAK: &str = "\n";

/// A maximal substring renderable with one font, or a line break
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    /// `None` only for line breaks
    pub font: Option<FontId>,
    pub text: String,
}

impl Run {
    fn glyphs(font: FontId, text: String) -> Self {
        Self {
            font: Some(font),
            text,
        }
    }

    fn line_break() -> Self {
        Self {
            font: None,
            text: LINE_BREAK.to_string(),
        }
    }

    pub fn is_line_break(&self) -> bool {
        self.font.is_none() && self.text == LINE_BREAK
    }
}

/// Shaped runs plus pixel measurements
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextMetrics {
    pub runs: Vec<Run>,
    /// Width of each line; one entry per line
    pub line_widths: Vec<i32>,
    /// Widest line
    pub width: i32,
    /// Line count times the font set's line height
    pub height: i32,
    /// Horizontal advance of each run, parallel to `runs`; zero for breaks
    pub advances: Vec<i32>,
}

impl TextMetrics {
    pub fn line_count(&self) -> usize {
        self.line_widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Shape `text` against `set` and measure it.
///
/// Empty input yields empty metrics with zero size. Every other input has
/// at least one line, plus one per line break.
pub fn shape<F: FontSystem + ?Sized>(fonts: &F, set: &FontSet, text: &[u8]) -> TextMetrics {
    if text.is_empty() {
        return TextMetrics::default();
    }

    let runs = split_runs(fonts, set, text);

    let mut advances = Vec::with_capacity(runs.len());
    let mut line_widths = Vec::new();
    let mut current = 0;
    for run in &runs {
        match run.font {
            Some(font) if !run.is_line_break() => {
                let advance = fonts.text_advance(font, &run.text);
                current += advance;
                advances.push(advance);
            }
            _ => {
                line_widths.push(current);
                current = 0;
                advances.push(0);
            }
        }
    }
    line_widths.push(current);

    let width = line_widths.iter().copied().max().unwrap_or(0);
    let height = line_widths.len() as i32 * set.line_height();

    TextMetrics {
        runs,
        line_widths,
        width,
        height,
        advances,
    }
}

fn split_runs<F: FontSystem + ?Sized>(fonts: &F, set: &FontSet, text: &[u8]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut current: Option<FontId> = None;
    let mut buf = String::new();

    for ch in Utf8Decoder::new(text) {
        if ch == '\n' {
            if let Some(font) = current.take() {
                if !buf.is_empty() {
                    runs.push(Run::glyphs(font, std::mem::take(&mut buf)));
                }
            }
            runs.push(Run::line_break());
            continue;
        }

        let font = pick_font(fonts, set, ch);
        match current {
            Some(active) if active != font => {
                runs.push(Run::glyphs(active, std::mem::take(&mut buf)));
                current = Some(font);
            }
            None => current = Some(font),
            _ => {}
        }
        buf.push(ch);
    }

    if let Some(font) = current {
        if !buf.is_empty() {
            runs.push(Run::glyphs(font, buf));
        }
    }
    runs
}
