//! Line records and cursor positions.
//!
//! Text enters the editor once (`split_lines`) and is held as an ordered
//! sequence of immutable `Line` values until the whole document is replaced.
//! Each line lazily caches its rendered width for the metrics it was last
//! measured with; replacing the text drops the cache.
//!
//! Invariants:
//! * `split_lines` never returns an empty vector. Empty input yields one empty
//!   line; a trailing `'\n'` yields a trailing empty line.
//! * `join_lines(&split_lines(t)) == t` for every `t`.
//! * Columns are character offsets, not bytes. `column == line.len()` is the
//!   end-of-line position and is valid.

use std::cell::Cell;

pub mod metrics;

pub use metrics::{CellMetrics, FixedMetrics, FontMetrics, MAX_LINE_HEIGHT};

/// A cursor position expressed as (line index, character column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
    pub fn origin() -> Self {
        Self { line: 0, column: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.column = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.column > max_len {
            self.column = max_len;
        }
    }
}

/// One row of text between line breaks.
#[derive(Debug, Clone, Default)]
pub struct Line {
    text: String,
    char_len: usize,
    cached_width: Cell<Option<u32>>,
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Line {}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            text,
            char_len,
            cached_width: Cell::new(None),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters (the largest valid cursor column).
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Rendered width in pixels, measured once and cached.
    pub fn width(&self, metrics: &dyn FontMetrics) -> u32 {
        if let Some(w) = self.cached_width.get() {
            return w;
        }
        let w = metrics.text_width(&self.text);
        self.cached_width.set(Some(w));
        w
    }

    #[cfg(test)]
    fn has_cached_width(&self) -> bool {
        self.cached_width.get().is_some()
    }

    /// Pixel x offset of `column`: sum of glyph widths of the characters before it.
    /// Columns past the end clamp to the line width.
    pub fn x_for_column(&self, column: usize, metrics: &dyn FontMetrics) -> u32 {
        self.text
            .chars()
            .take(column)
            .fold(0u32, |acc, c| acc.saturating_add(metrics.glyph_width(c)))
    }
}

/// Split `text` on `'\n'` into line records.
pub fn split_lines(text: &str) -> Vec<Line> {
    text.split('\n').map(Line::new).collect()
}

/// Inverse of [`split_lines`].
pub fn join_lines(lines: &[Line]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.text.len() + 1).sum());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&line.text);
    }
    out
}

/// Normalize CRLF / lone CR line endings to LF before splitting.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
