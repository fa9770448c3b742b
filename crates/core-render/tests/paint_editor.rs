//! Painting a `TextEditor` onto a terminal cell surface.
//!
//! Layout used throughout: 8x5 widget, padding 1, 1-cell scrollbars.
//! Vertical bar at column 7 (rows 0..4), horizontal bar on row 4
//! (columns 0..7), corner at (7,4). Text starts at (1,1).

use core_model::{EditorOptions, Focusable, Point, Rect, Size, TextEditor};
use core_render::{CellSurface, Color, PaintSurface, Paintable, visible_lines};
use core_text::{CellMetrics, FontMetrics};
use pretty_assertions::assert_eq;
use std::time::Instant;

fn editor(text: &str) -> TextEditor {
    let mut e = TextEditor::new(
        Box::new(CellMetrics::new()),
        EditorOptions {
            padding: 1,
            ..EditorOptions::default()
        },
    );
    e.resize(Size::new(8, 5));
    e.set_text(text);
    e
}

fn paint_all(e: &TextEditor) -> CellSurface {
    let mut s = CellSurface::new(8, 5);
    e.paint(&mut s, e.rect());
    s
}

fn bg(s: &CellSurface, x: u16, y: u16) -> Color {
    s.cell(x, y).map(|c| c.bg).unwrap_or(Color::BLACK)
}

#[test]
fn unfocused_paint_is_plain_text() {
    let e = editor("abc\ndef\nghi");
    let s = paint_all(&e);
    assert_eq!(s.row_text(1), " abc    ");
    assert_eq!(s.row_text(2), " def    ");
    assert_eq!(bg(&s, 1, 1), Color::WHITE, "no cursor without focus");
    assert_eq!(bg(&s, 2, 1), Color::WHITE, "no line highlight without focus");
    assert_eq!(bg(&s, 0, 0), Color::WHITE, "no focus frame");
}

#[test]
fn focused_paint_marks_cursor_line_and_frame() {
    let mut e = editor("abc\ndef\nghi");
    e.focus_in(Instant::now());
    let s = paint_all(&e);
    assert_eq!(s.row_text(1), " abc    ");
    assert_eq!(bg(&s, 1, 1), Color::RED, "cursor cell");
    assert_eq!(s.cell(1, 1).unwrap().glyph, "a", "glyph stays on the cursor");
    assert_eq!(bg(&s, 2, 1), Color::LINE_HIGHLIGHT);
    assert_eq!(bg(&s, 2, 2), Color::WHITE);
    assert_eq!(bg(&s, 0, 0), Color::FOCUS_FRAME);
    assert_eq!(bg(&s, 6, 2), Color::FOCUS_FRAME, "right edge of the item area");
    assert_eq!(bg(&s, 2, 3), Color::FOCUS_FRAME, "bottom edge of the item area");
}

#[test]
fn scrollbars_and_corner() {
    let e = editor("abc\ndef\nghi");
    let s = paint_all(&e);
    // three lines, two visible: vertical thumb covers half the track
    assert_eq!(bg(&s, 7, 0), Color::DARK_GRAY);
    assert_eq!(bg(&s, 7, 1), Color::DARK_GRAY);
    assert_eq!(bg(&s, 7, 2), Color::LIGHT_GRAY);
    assert_eq!(bg(&s, 7, 3), Color::LIGHT_GRAY);
    // nothing to scroll horizontally: bare track
    assert_eq!(bg(&s, 3, 4), Color::LIGHT_GRAY);
    assert_eq!(bg(&s, 7, 4), Color::LIGHT_GRAY, "corner");
}

#[test]
fn hidden_blink_phase_skips_cursor() {
    let now = Instant::now();
    let mut e = editor("abc");
    e.focus_in(now);
    assert!(e.poll_timer(now + e.blink_timer().interval()));
    assert!(!e.cursor_visible());
    let s = paint_all(&e);
    assert_eq!(bg(&s, 1, 1), Color::LINE_HIGHLIGHT);
}

#[test]
fn scrolled_view_paints_offset_lines() {
    let mut e = editor("abc\ndef\nghi");
    e.focus_in(Instant::now());
    e.set_cursor(2, 3);
    assert_eq!(e.vertical_scrollbar().value(), 1);
    let s = paint_all(&e);
    assert_eq!(s.row_text(1), " def    ");
    assert_eq!(s.row_text(2), " ghi    ");
    assert_eq!(bg(&s, 4, 2), Color::RED, "end-of-line cursor");
    assert_eq!(bg(&s, 7, 2), Color::DARK_GRAY, "thumb moved down");
}

#[test]
fn visible_lines_follow_clip() {
    let mut e = editor("a\nb\nc\nd\ne\nf");
    assert_eq!(visible_lines(&e, Rect::new(0, 1, 8, 1)), 0..1);
    assert_eq!(visible_lines(&e, Rect::new(0, 2, 8, 1)), 1..2);
    e.set_cursor(5, 0);
    let top = e.vertical_scrollbar().value();
    assert_eq!(top, 4);
    assert_eq!(visible_lines(&e, Rect::new(0, 1, 8, 2)), 4..6);
    assert_eq!(visible_lines(&e, Rect::new(0, 0, 0, 0)), 3..3);
}

#[test]
fn damage_rects_repaint_only_cursor_lines() {
    let mut e = editor("abc\ndef\nghi");
    e.focus_in(Instant::now());
    let mut s = paint_all(&e);
    e.take_damage();
    let mut w = core_render::Writer::new();
    s.emit(&mut w, (0, 0));

    e.set_cursor(1, 0);
    let rects = e.take_damage_rects();
    assert_eq!(rects.len(), 2);
    for r in rects {
        e.paint(&mut s, r);
    }
    assert!(s.is_row_dirty(1));
    assert!(s.is_row_dirty(2));
    assert!(!s.is_row_dirty(4));
    assert_eq!(bg(&s, 1, 2), Color::RED);
    assert_eq!(bg(&s, 2, 1), Color::WHITE, "old cursor line cleared");
}

/// Records surface calls to check paint order.
#[derive(Default)]
struct Recorder {
    ops: Vec<String>,
    clip: Rect,
    translation: Point,
}

impl PaintSurface for Recorder {
    fn set_clip(&mut self, rect: Rect) {
        self.clip = rect;
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
        self.ops.push(format!("fill {},{} {}x{} {:?}", rect.x, rect.y, rect.width, rect.height, color));
    }
    fn draw_rect(&mut self, _rect: Rect, _color: Color) {
        self.ops.push("frame".to_string());
    }
    fn draw_text(&mut self, _rect: Rect, text: &str, _m: &dyn FontMetrics, _color: Color) {
        self.ops.push(format!("text {text}"));
    }
}

#[test]
fn cursor_is_filled_before_its_line_text_and_translation_balances() {
    let mut e = editor("abc\ndef");
    e.focus_in(Instant::now());
    let mut r = Recorder::default();
    e.paint(&mut r, e.rect());
    let red = r.ops.iter().position(|o| o.contains("r: 255, g: 0, b: 0")).unwrap();
    let text = r.ops.iter().position(|o| o == "text abc").unwrap();
    assert!(red < text);
    assert!(r.ops.iter().any(|o| o == "frame"));
    assert_eq!(r.translation, Point::new(0, 0));
    assert_eq!(r.ops.first().map(String::as_str), Some("fill 0,0 8x5 Color { r: 255, g: 255, b: 255 }"));
}
