//! Font metrics providers.
//!
//! The editor never measures text itself; it asks a `FontMetrics` for glyph
//! widths and the line height. Two providers ship with the crate:
//! * `CellMetrics`: terminal cells, one "pixel" per cell, widths from
//!   `unicode-width` (wide CJK = 2, combining marks = 0).
//! * `FixedMetrics`: every glyph the same width, used by tests and by hosts
//!   with a true monospace bitmap font.

use unicode_width::UnicodeWidthChar;

/// Largest line height a provider reports. Keeps document heights (lines x
/// line height) inside `i32` pixel space for any realistic line count.
pub const MAX_LINE_HEIGHT: u32 = 4096;

pub trait FontMetrics {
    /// Advance width of a single character in pixels.
    fn glyph_width(&self, c: char) -> u32;

    /// Height of one text line in pixels.
    fn line_height(&self) -> u32;

    /// Width of a whole string. Default sums glyph advances, which keeps
    /// `Line::width` consistent with `Line::x_for_column` at end of line.
    fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .fold(0u32, |acc, c| acc.saturating_add(self.glyph_width(c)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    line_height: u32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CellMetrics {
    pub fn new() -> Self {
        Self { line_height: 1 }
    }

    /// Line height clamped to `1..=MAX_LINE_HEIGHT`.
    pub fn with_line_height(line_height: u32) -> Self {
        Self {
            line_height: line_height.clamp(1, MAX_LINE_HEIGHT),
        }
    }
}

impl FontMetrics for CellMetrics {
    fn glyph_width(&self, c: char) -> u32 {
        // Control characters have no defined width; the cell surface prints a
        // placeholder for them, so reserve one cell.
        c.width().unwrap_or(1) as u32
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMetrics {
    glyph_width: u32,
    line_height: u32,
}

impl FixedMetrics {
    pub fn new(glyph_width: u32, line_height: u32) -> Self {
        Self {
            glyph_width,
            line_height: line_height.clamp(1, MAX_LINE_HEIGHT),
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn glyph_width(&self, _c: char) -> u32 {
        self.glyph_width
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }
}
