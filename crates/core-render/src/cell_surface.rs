//! Terminal cell grid implementing `PaintSurface`.
//!
//! One cell is one pixel. A glyph wider than one cell is stored as a leader
//! cell followed by continuation cells (`width == 0`) that never print.
//!
//! Invariants:
//! - Leader: width >= 1, `glyph` non-empty.
//! - Continuation: width == 0, `glyph` empty, immediately after its leader.
//! - Overwriting any part of a wide glyph blanks the rest of it, so no
//!   orphaned leaders or continuations remain.
//! - Rows touched since the last `emit` are flagged dirty; `emit` writes only
//!   those rows.

use crate::surface::{Color, PaintSurface};
use crate::writer::Writer;
use core_model::{Point, Rect};
use core_text::{FontMetrics, MAX_LINE_HEIGHT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub glyph: String,
    pub width: u8,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub fn blank(bg: Color) -> Self {
        Self {
            glyph: " ".to_string(),
            width: 1,
            fg: Color::BLACK,
            bg,
        }
    }

    fn leader(glyph: char, width: u8, fg: Color, bg: Color) -> Self {
        Self {
            glyph: glyph.to_string(),
            width: width.max(1),
            fg,
            bg,
        }
    }

    fn continuation(fg: Color, bg: Color) -> Self {
        Self {
            glyph: String::new(),
            width: 0,
            fg,
            bg,
        }
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank(Color::WHITE)
    }
}

#[derive(Debug, Clone)]
pub struct CellSurface {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    dirty_rows: Vec<bool>,
    clip: Rect,
    translation: Point,
}

impl CellSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            dirty_rows: vec![true; height as usize],
            clip: Rect::new(0, 0, width as i32, height as i32),
            translation: Point::default(),
        }
    }

    /// Reallocate for a new size. Contents are reset and every row is dirty.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Drop translation and clip before a new paint pass.
    pub fn reset_state(&mut self) {
        self.translation = Point::default();
        self.clip = self.bounds();
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x as i32, y as i32).map(|i| &self.cells[i])
    }

    /// Printable contents of a row (continuations skipped).
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| c.glyph.as_str())
            .collect()
    }

    pub fn is_row_dirty(&self, y: u16) -> bool {
        self.dirty_rows.get(y as usize).copied().unwrap_or(false)
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty_rows.iter_mut().for_each(|d| *d = true);
    }

    /// Map a painter rect to surface cells inside the clip.
    fn device_rect(&self, rect: Rect) -> Rect {
        rect.translated(self.translation.x, self.translation.y)
            .intersection(&self.clip)
    }

    fn put(&mut self, x: i32, y: i32, cell: Cell) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        self.break_wide(x, y);
        if self.cells[idx] != cell {
            self.cells[idx] = cell;
            self.dirty_rows[y as usize] = true;
        }
    }

    /// Blank the remains of any wide glyph overlapping (x, y).
    fn break_wide(&mut self, x: i32, y: i32) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let row_start = y as usize * self.width as usize;
        // Walk back to the leader of this cell.
        let mut lead = idx;
        while lead > row_start && !self.cells[lead].is_leader() {
            lead -= 1;
        }
        let w = self.cells[lead].width as usize;
        if w <= 1 && lead == idx {
            return;
        }
        let row_end = row_start + self.width as usize;
        for i in lead..(lead + w.max(1)).min(row_end) {
            if i != idx {
                let bg = self.cells[i].bg;
                self.cells[i] = Cell::blank(bg);
            }
        }
        self.dirty_rows[y as usize] = true;
    }

    /// Queue dirty rows to `writer`, placing the surface at `origin`.
    pub fn emit(&mut self, writer: &mut Writer, origin: (u16, u16)) {
        for y in 0..self.height {
            if !self.dirty_rows[y as usize] {
                continue;
            }
            writer.move_to(origin.0, origin.1.saturating_add(y));
            let start = y as usize * self.width as usize;
            for cell in &self.cells[start..start + self.width as usize] {
                if !cell.is_leader() {
                    continue;
                }
                writer.set_colors(cell.fg, cell.bg);
                writer.print_cell(&cell.glyph);
            }
            self.dirty_rows[y as usize] = false;
        }
    }
}

impl PaintSurface for CellSurface {
    fn set_clip(&mut self, rect: Rect) {
        self.clip = rect.intersection(&self.bounds());
    }

    fn clip(&self) -> Rect {
        self.clip
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.translation.x += dx;
        self.translation.y += dy;
    }

    fn translation(&self) -> Point {
        self.translation
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = self.device_rect(rect);
        for y in r.top()..r.bottom() {
            for x in r.left()..r.right() {
                self.put(x, y, Cell::blank(color));
            }
        }
    }

    /// Terminal cells cannot hold a sub-cell line, so the outline recolours
    /// the background of the edge cells and leaves their glyphs alone.
    fn draw_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let outer = rect.translated(self.translation.x, self.translation.y);
        let area = outer.intersection(&self.clip);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let edge = y == outer.top()
                    || y == outer.bottom() - 1
                    || x == outer.left()
                    || x == outer.right() - 1;
                if !edge {
                    continue;
                }
                if let Some(idx) = self.index(x, y)
                    && self.cells[idx].bg != color
                {
                    self.cells[idx].bg = color;
                    self.dirty_rows[y as usize] = true;
                }
            }
        }
    }

    fn draw_text(&mut self, rect: Rect, text: &str, metrics: &dyn FontMetrics, color: Color) {
        let lh = metrics.line_height().min(MAX_LINE_HEIGHT) as i32;
        let origin = rect.translated(self.translation.x, self.translation.y);
        let y = origin.y + (origin.height - lh).max(0) / 2;
        let clip = self.clip.intersection(&origin);
        if y < clip.top() || y >= clip.bottom() {
            return;
        }
        let mut x = origin.x;
        for ch in text.chars() {
            let w = i32::try_from(metrics.glyph_width(ch)).unwrap_or(i32::MAX);
            if x >= clip.right() {
                break;
            }
            if w == 0 {
                continue;
            }
            let span = Rect::new(x, y, w, 1);
            if clip.contains(&span) {
                for dx in 0..w {
                    self.break_wide(x + dx, y);
                }
                let bg = self.index(x, y).map(|i| self.cells[i].bg).unwrap_or(Color::WHITE);
                self.put(x, y, Cell::leader(ch, w.min(u8::MAX as i32) as u8, color, bg));
                for dx in 1..w {
                    if let Some(i) = self.index(x + dx, y) {
                        let bg = self.cells[i].bg;
                        self.cells[i] = Cell::continuation(color, bg);
                        self.dirty_rows[y as usize] = true;
                    }
                }
            } else {
                // Partially clipped glyph: keep the visible cells blank.
                let visible = span.intersection(&clip);
                for cx in visible.left()..visible.right() {
                    let bg = self.index(cx, y).map(|i| self.cells[i].bg).unwrap_or(Color::WHITE);
                    self.put(cx, y, Cell::blank(bg));
                }
            }
            x = x.saturating_add(w);
        }
    }
}
