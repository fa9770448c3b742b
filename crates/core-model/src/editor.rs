//! Viewport/cursor controller.
//!
//! `TextEditor` turns a flat text into `Line` records, tracks one cursor and
//! keeps it visible by driving two scrollbars whose values are the viewport
//! offsets. It is a pure state machine: painting, timers and input delivery
//! belong to the host, which feeds events in and drains damage out.
//!
//! Coordinate spaces:
//! * content: origin at the first character of line 0; lines are stacked at
//!   `line_height` intervals.
//! * widget: content translated by `-(offset - padding)` on each axis.
//!
//! Invariants (hold after every public call):
//! * `lines` is never empty.
//! * `cursor.line < lines.len()` and `cursor.column <= lines[cursor.line].len()`.
//! * Each scrollbar value is within `[0, max(0, content_extent - visible_extent)]`.
//! * `scroll_cursor_into_view` applied twice changes nothing the second time.

use crate::blink::{BlinkTimer, DEFAULT_BLINK_INTERVAL};
use crate::damage::{Damage, DamageTracker};
use crate::geometry::{Point, Rect, Size};
use crate::movement::Movement;
use crate::scrollbar::{Orientation, ScrollBar};
use crate::widget::{Focusable, Scrollable};
use crate::EditorObserver;
use core_events::KeyEvent;
use core_text::{FontMetrics, Line, MAX_LINE_HEIGHT, Position, join_lines, split_lines};
use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Width of the cursor bar in pixels. Also added to the horizontal content
/// extent so an end-of-line cursor on the widest line can be scrolled to.
pub const CURSOR_WIDTH: i32 = 1;

/// Pixel extents past `i32::MAX` saturate.
fn pixels(value: impl TryInto<i32>) -> i32 {
    value.try_into().unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub padding: i32,
    pub scrollbar_thickness: i32,
    pub scroll_step: i32,
    pub horizontal_big_step: i32,
    pub blink_interval: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            padding: 0,
            scrollbar_thickness: 1,
            scroll_step: 4,
            horizontal_big_step: 30,
            blink_interval: DEFAULT_BLINK_INTERVAL,
        }
    }
}

pub struct TextEditor {
    lines: Vec<Line>,
    cursor: Position,
    /// Blink phase: true while the cursor is drawn.
    cursor_state: bool,
    focused: bool,
    blink: BlinkTimer,
    size: Size,
    padding: i32,
    scrollbar_thickness: i32,
    metrics: Box<dyn FontMetrics>,
    vertical: ScrollBar,
    horizontal: ScrollBar,
    content_width: Cell<Option<i32>>,
    damage: DamageTracker,
    observers: Vec<Box<dyn EditorObserver>>,
}

impl std::fmt::Debug for TextEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEditor")
            .field("line_count", &self.lines.len())
            .field("cursor", &self.cursor)
            .field("cursor_state", &self.cursor_state)
            .field("focused", &self.focused)
            .field("size", &self.size)
            .field("offsets", &self.scroll_offsets())
            .finish()
    }
}

impl TextEditor {
    pub fn new(metrics: Box<dyn FontMetrics>, options: EditorOptions) -> Self {
        let mut vertical = ScrollBar::new(Orientation::Vertical);
        vertical.set_step(options.scroll_step);
        let mut horizontal = ScrollBar::new(Orientation::Horizontal);
        horizontal.set_step(options.scroll_step);
        horizontal.set_big_step(options.horizontal_big_step);
        Self {
            lines: split_lines(""),
            cursor: Position::origin(),
            cursor_state: true,
            focused: false,
            blink: BlinkTimer::new(options.blink_interval),
            size: Size::default(),
            padding: options.padding.max(0),
            scrollbar_thickness: options.scrollbar_thickness.max(0),
            metrics,
            vertical,
            horizontal,
            content_width: Cell::new(None),
            damage: DamageTracker::new(),
            observers: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------------------------------

    /// Replace the document. The cursor returns to (0,0) and is scrolled into
    /// view even if it was already there; the whole widget is redrawn.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.content_width.set(None);
        debug!(
            target: "editor.text",
            line_count = self.lines.len(),
            size_bytes = text.len(),
            "text_set"
        );
        self.update_scrollbar_ranges();
        if !self.set_cursor(0, 0) {
            self.scroll_cursor_into_view();
        }
        self.update();
    }

    pub fn text(&self) -> String {
        join_lines(&self.lines)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(Line::len).unwrap_or(0)
    }

    fn current_line(&self) -> &Line {
        &self.lines[self.cursor.line]
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }

    pub fn line_height(&self) -> i32 {
        pixels(self.metrics.line_height().clamp(1, MAX_LINE_HEIGHT))
    }

    /// Widest line in pixels, cached until the text or metrics change.
    pub fn content_width(&self) -> i32 {
        if let Some(w) = self.content_width.get() {
            return w;
        }
        let metrics = self.metrics.as_ref();
        let w = self
            .lines
            .iter()
            .map(|l| pixels(l.width(metrics)))
            .max()
            .unwrap_or(0);
        self.content_width.set(Some(w));
        w
    }

    pub fn content_height(&self) -> i32 {
        self.line_top(self.lines.len())
    }

    /// Content y of a line's top edge.
    fn line_top(&self, line_index: usize) -> i32 {
        pixels(line_index).saturating_mul(self.line_height())
    }

    // ---------------------------------------------------------------------------------------------
    // Cursor
    // ---------------------------------------------------------------------------------------------

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Whether the blink phase currently shows the cursor.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_state
    }

    /// Move the cursor, clamping out-of-range requests. Returns false when the
    /// clamped position equals the current one (nothing happens then).
    pub fn set_cursor(&mut self, line: usize, column: usize) -> bool {
        let mut target = Position::new(line, column);
        let lines = &self.lines;
        target.clamp_to(lines.len(), |i| lines[i].len());
        if target == self.cursor {
            return false;
        }
        self.update_cursor();
        self.cursor = target;
        self.cursor_state = true;
        self.update_cursor();
        self.scroll_cursor_into_view();
        trace!(
            target: "editor.cursor",
            line = target.line,
            column = target.column,
            "cursor_set"
        );
        for observer in &mut self.observers {
            observer.cursor_changed(target);
        }
        true
    }

    /// Apply one movement. Returns true if the cursor moved.
    pub fn move_cursor(&mut self, movement: Movement) -> bool {
        let Position { line, column } = self.cursor;
        let last_line = self.lines.len() - 1;
        match movement {
            Movement::Up => {
                if line == 0 {
                    return false;
                }
                let new_line = line - 1;
                self.set_cursor(new_line, column.min(self.line_len(new_line)))
            }
            Movement::Down => {
                if line >= last_line {
                    return false;
                }
                let new_line = line + 1;
                self.set_cursor(new_line, column.min(self.line_len(new_line)))
            }
            Movement::Left => {
                if column == 0 {
                    return false;
                }
                self.set_cursor(line, column - 1)
            }
            Movement::Right => {
                if column >= self.current_line().len() {
                    return false;
                }
                self.set_cursor(line, column + 1)
            }
            Movement::LineStart => self.set_cursor(line, 0),
            Movement::LineEnd => self.set_cursor(line, self.current_line().len()),
            Movement::DocumentStart => self.set_cursor(0, 0),
            Movement::DocumentEnd => self.set_cursor(last_line, self.line_len(last_line)),
        }
    }

    /// Keyboard entry point. Returns false for keys the editor does not bind
    /// so the host can handle them.
    pub fn keydown(&mut self, key: &KeyEvent) -> bool {
        match Movement::from_key(key) {
            Some(movement) => {
                self.move_cursor(movement);
                true
            }
            None => false,
        }
    }

    /// Mouse presses are accepted and ignored; the cursor moves by keyboard only.
    pub fn mouse_down(&mut self, point: Point) -> bool {
        trace!(target: "editor.input", x = point.x, y = point.y, "mouse_down_ignored");
        false
    }

    pub fn add_observer(&mut self, observer: Box<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    // ---------------------------------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------------------------------

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn padding(&self) -> i32 {
        self.padding
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size)
    }

    pub fn vertical_scrollbar(&self) -> &ScrollBar {
        &self.vertical
    }

    pub fn horizontal_scrollbar(&self) -> &ScrollBar {
        &self.horizontal
    }

    fn scrollbar_mut(&mut self, orientation: Orientation) -> &mut ScrollBar {
        match orientation {
            Orientation::Vertical => &mut self.vertical,
            Orientation::Horizontal => &mut self.horizontal,
        }
    }

    /// Visible part of the content, in content coordinates.
    pub fn visible_content_rect(&self) -> Rect {
        Rect::new(
            self.horizontal.value(),
            self.vertical.value(),
            self.size.width - self.vertical.thickness() - self.padding.saturating_mul(2),
            self.size.height - self.horizontal.thickness() - self.padding.saturating_mul(2),
        )
    }

    /// Cursor bar in content coordinates.
    pub fn cursor_content_rect(&self) -> Rect {
        let x = self
            .current_line()
            .x_for_column(self.cursor.column, self.metrics.as_ref());
        let lh = self.line_height();
        Rect::new(pixels(x), self.line_top(self.cursor.line), CURSOR_WIDTH, lh)
    }

    pub fn line_content_rect(&self, line_index: usize) -> Rect {
        let lh = self.line_height();
        Rect::new(0, self.line_top(line_index), self.content_width(), lh)
    }

    /// Width painted for each line row: the content or the widget, whichever is wider.
    pub fn exposed_width(&self) -> i32 {
        self.content_width().max(self.size.width)
    }

    /// A line's row in widget coordinates, clipped to the widget.
    pub fn line_widget_rect(&self, line_index: usize) -> Rect {
        let rect = self
            .line_content_rect(line_index)
            .with_width(self.exposed_width().saturating_add(CURSOR_WIDTH))
            .translated(
                -(self.horizontal.value() - self.padding),
                -(self.vertical.value() - self.padding),
            );
        rect.intersection(&self.rect())
    }

    /// Lay out scrollbars for a new widget size and recompute their ranges.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        let t = self.scrollbar_thickness;
        self.vertical.set_relative_rect(Rect::new(
            size.width - t,
            0,
            t,
            size.height - t,
        ));
        self.horizontal.set_relative_rect(Rect::new(
            0,
            size.height - t,
            size.width - t,
            t,
        ));
        debug!(
            target: "editor.scroll",
            width = size.width,
            height = size.height,
            "resized"
        );
        self.update_scrollbar_ranges();
        self.update();
    }

    /// Recompute both scroll ranges from content and visible extents. Values
    /// that fall outside a shrunken range are clamped (and redrawn).
    pub fn update_scrollbar_ranges(&mut self) {
        let visible = self.visible_content_rect();
        let excess_height = (self.content_height() - visible.height).max(0);
        let excess_width = (self.content_width().saturating_add(CURSOR_WIDTH) - visible.width).max(0);
        let mut changed = self.vertical.set_range(0, excess_height);
        changed |= self.horizontal.set_range(0, excess_width);
        self.vertical.set_big_step(visible.height);
        if changed {
            self.update();
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Scrolling
    // ---------------------------------------------------------------------------------------------

    /// Bring the cursor rect into the visible rect with the smallest offset
    /// change per axis. Returns true if an offset changed.
    pub fn scroll_cursor_into_view(&mut self) -> bool {
        let visible = self.visible_content_rect();
        let rect = self.cursor_content_rect();
        if visible.is_empty() || visible.contains(&rect) {
            return false;
        }

        let mut changed = false;
        if rect.top() < visible.top() {
            changed |= self.vertical.set_value(rect.top());
        } else if rect.bottom() > visible.bottom() {
            // A viewport shorter than one line keeps the line's top edge.
            changed |= self
                .vertical
                .set_value((rect.bottom() - visible.height).min(rect.top()));
        }

        if rect.left() < visible.left() {
            changed |= self.horizontal.set_value(rect.left());
        } else if rect.right() > visible.right() {
            changed |= self
                .horizontal
                .set_value((rect.right() - visible.width).min(rect.left()));
        }

        if changed {
            trace!(
                target: "editor.scroll",
                x = self.horizontal.value(),
                y = self.vertical.value(),
                "scrolled_into_view"
            );
            self.update();
        }
        changed
    }

    /// Scroll by whole pages (the axis's big step) without moving the cursor.
    /// Returns true if the offset changed.
    pub fn scroll_by_pages(&mut self, orientation: Orientation, pages: i32) -> bool {
        let bar = self.scrollbar_mut(orientation);
        let changed = bar.scroll_by_pages(pages);
        let value = bar.value();
        if changed {
            trace!(target: "editor.scroll", pages, value, "paged");
            self.update();
        }
        changed
    }

    /// Set one offset directly (host scrollbar drag). Returns true if it changed.
    pub fn set_scroll_offset(&mut self, orientation: Orientation, value: i32) -> bool {
        let changed = self.scrollbar_mut(orientation).set_value(value);
        if changed {
            self.update();
        }
        changed
    }

    // ---------------------------------------------------------------------------------------------
    // Focus & blink
    // ---------------------------------------------------------------------------------------------

    /// Blink half-period tick: toggle visibility and redraw the cursor line
    /// while focused.
    pub fn timer_event(&mut self) {
        self.cursor_state = !self.cursor_state;
        if self.focused {
            self.update_cursor();
        }
    }

    /// Drive the blink timer from the host's clock. Returns true if it fired.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        if self.blink.poll(now) {
            self.timer_event();
            return true;
        }
        false
    }

    pub fn blink_timer(&self) -> &BlinkTimer {
        &self.blink
    }

    // ---------------------------------------------------------------------------------------------
    // Redraw requests
    // ---------------------------------------------------------------------------------------------

    /// Request a full repaint.
    fn update(&mut self) {
        self.damage.mark_full();
    }

    fn update_cursor(&mut self) {
        let rect = self.line_widget_rect(self.cursor.line);
        self.damage.mark(rect);
    }

    pub fn has_damage(&self) -> bool {
        !self.damage.is_empty()
    }

    /// Drain pending redraw requests (widget coordinates).
    pub fn take_damage(&mut self) -> Damage {
        self.damage.take()
    }

    /// Drain pending redraw requests clipped to the widget.
    pub fn take_damage_rects(&mut self) -> Vec<Rect> {
        let bounds = self.rect();
        self.damage.take_within(bounds)
    }
}

impl Focusable for TextEditor {
    fn focus_in(&mut self, now: Instant) {
        self.focused = true;
        self.cursor_state = true;
        self.blink.start(now);
        debug!(target: "editor.focus", "focus_in");
        self.update();
    }

    fn focus_out(&mut self) {
        self.focused = false;
        self.blink.stop();
        debug!(target: "editor.focus", "focus_out");
        self.update();
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Scrollable for TextEditor {
    fn scroll_offsets(&self) -> Point {
        Point::new(self.horizontal.value(), self.vertical.value())
    }

    fn scroll_by(&mut self, orientation: Orientation, steps: i32) -> bool {
        let changed = self.scrollbar_mut(orientation).scroll_by_steps(steps);
        if changed {
            self.update();
        }
        changed
    }
}
