//! Painting for the text editor and its scrollbars.
//!
//! Paint order for one exposed rect:
//! 1. clip to the rect and clear it white;
//! 2. translate into content space (`padding - offset` per axis);
//! 3. for each line crossing the rect: cursor-line highlight and cursor bar
//!    (focused only), then the line text, left-aligned and vertically centred
//!    in a row as wide as `max(content width, widget width)`;
//! 4. back in widget space: scrollbar corner, focus frame, scrollbars.
//!
//! The cursor bar goes down before its line's text so a one-cell cursor on
//! a cell surface shows the glyph it sits on.

use crate::surface::{Color, PaintSurface};
use core_model::{Focusable, Orientation, Rect, ScrollBar, Scrollable, TextEditor};
use std::ops::Range;
use tracing::trace;

/// Widgets that can draw themselves into a clip rect (widget coordinates).
pub trait Paintable {
    fn paint(&self, surface: &mut dyn PaintSurface, clip: Rect);
}

/// Lines whose rows intersect `clip` (widget coordinates).
pub fn visible_lines(editor: &TextEditor, clip: Rect) -> Range<usize> {
    let lh = editor.line_height().max(1);
    let offsets = editor.scroll_offsets();
    let dy = editor.padding() - offsets.y;
    let top = (clip.top() - dy).max(0);
    let bottom = (clip.bottom() - dy).max(0);
    let first = (top / lh) as usize;
    let end = ((bottom.saturating_add(lh - 1) / lh) as usize).min(editor.line_count());
    first.min(end)..end
}

pub fn paint_editor(editor: &TextEditor, surface: &mut dyn PaintSurface, clip: Rect) {
    let clip = clip.intersection(&editor.rect());
    if clip.is_empty() {
        return;
    }
    surface.set_clip(clip);
    surface.fill_rect(clip, Color::WHITE);

    let offsets = editor.scroll_offsets();
    let dx = editor.padding() - offsets.x;
    let dy = editor.padding() - offsets.y;
    surface.translate(dx, dy);

    let exposed_width = editor.exposed_width();
    let cursor = editor.cursor();
    let focused = editor.is_focused();
    let metrics = editor.metrics();
    for i in visible_lines(editor, clip) {
        let Some(line) = editor.line(i) else {
            continue;
        };
        let line_rect = editor.line_content_rect(i).with_width(exposed_width);
        if i == cursor.line && focused {
            surface.fill_rect(line_rect, Color::LINE_HIGHLIGHT);
            if editor.cursor_visible() {
                surface.fill_rect(editor.cursor_content_rect(), Color::RED);
            }
        }
        surface.draw_text(line_rect, line.text(), metrics, Color::BLACK);
    }

    surface.translate(-dx, -dy);

    let vbar = editor.vertical_scrollbar();
    let hbar = editor.horizontal_scrollbar();
    let hrect = hbar.relative_rect();
    let corner = Rect::new(hrect.right(), hrect.top(), vbar.thickness(), hbar.thickness());
    surface.fill_rect(corner, Color::LIGHT_GRAY);

    if focused {
        let size = editor.size();
        let item_area = Rect::new(
            0,
            0,
            size.width - vbar.thickness(),
            size.height - hbar.thickness(),
        );
        surface.draw_rect(item_area, Color::FOCUS_FRAME);
    }
}

/// Track plus a proportional thumb; no thumb when there is nothing to scroll.
pub fn paint_scrollbar(bar: &ScrollBar, surface: &mut dyn PaintSurface) {
    let track = bar.relative_rect();
    if track.is_empty() {
        return;
    }
    surface.fill_rect(track, Color::LIGHT_GRAY);
    if !bar.has_scrubbable_range() {
        return;
    }
    let thumb = match bar.orientation() {
        Orientation::Vertical => {
            let (start, len) = bar.thumb_span(track.height);
            Rect::new(track.x, track.y + start, track.width, len)
        }
        Orientation::Horizontal => {
            let (start, len) = bar.thumb_span(track.width);
            Rect::new(track.x + start, track.y, len, track.height)
        }
    };
    surface.fill_rect(thumb, Color::DARK_GRAY);
}

impl Paintable for TextEditor {
    fn paint(&self, surface: &mut dyn PaintSurface, clip: Rect) {
        trace!(
            target: "render.paint",
            x = clip.x,
            y = clip.y,
            width = clip.width,
            height = clip.height,
            "paint_editor"
        );
        paint_editor(self, surface, clip);
        let clip = clip.intersection(&self.rect());
        if clip.is_empty() {
            return;
        }
        surface.set_clip(clip);
        paint_scrollbar(self.vertical_scrollbar(), surface);
        paint_scrollbar(self.horizontal_scrollbar(), surface);
    }
}
