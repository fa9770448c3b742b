//! Terminal-independent application state: one window widget holding one
//! text editor, plus the cell surface it paints into.
//!
//! The runtime feeds decoded input and ticks in; `paint` drains editor damage
//! into the surface and queues changed rows to a writer.

use core_config::Config;
use core_events::{InputEvent, KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use core_model::{
    EditorOptions, FocusChange, Focusable, Orientation, Point, Rect, Scrollable, Size, TextEditor,
    WidgetId, WidgetTree,
};
use core_render::{CellSurface, Paintable, Writer};
use core_text::{CellMetrics, Position};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    CtrlC,
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::Quit => "quit_key",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

/// Config values are capped well below `i32::MAX`; saturate regardless.
fn pixels(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub fn editor_options(config: &Config) -> EditorOptions {
    EditorOptions {
        padding: pixels(config.padding()),
        scrollbar_thickness: pixels(config.scrollbar_thickness()),
        scroll_step: pixels(config.scroll_step()),
        horizontal_big_step: pixels(config.horizontal_big_step()),
        blink_interval: config.blink_interval(),
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.mods.is_empty() && matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
}

pub struct App {
    editor: TextEditor,
    widgets: WidgetTree,
    window: WidgetId,
    editor_id: WidgetId,
    surface: CellSurface,
    cursor_moved: Rc<Cell<Option<Position>>>,
}

impl App {
    pub fn new(text: &str, config: &Config, size: (u16, u16), now: Instant) -> Self {
        let metrics = CellMetrics::with_line_height(config.line_height());
        let mut editor = TextEditor::new(Box::new(metrics), editor_options(config));
        let cursor_moved: Rc<Cell<Option<Position>>> = Rc::default();
        let sink = Rc::clone(&cursor_moved);
        editor.add_observer(Box::new(move |p: Position| sink.set(Some(p))));

        let bounds = Rect::new(0, 0, size.0 as i32, size.1 as i32);
        let mut widgets = WidgetTree::new();
        let window = widgets.add_root("window", bounds);
        let editor_id = widgets.add_child(window, "editor", bounds);

        editor.resize(bounds.size());
        editor.set_text(text);

        let mut app = Self {
            editor,
            widgets,
            window,
            editor_id,
            surface: CellSurface::new(size.0, size.1),
            cursor_moved,
        };
        app.set_focus(Some(editor_id), now);
        app
    }

    pub fn editor(&self) -> &TextEditor {
        &self.editor
    }

    pub fn surface(&self) -> &CellSurface {
        &self.surface
    }

    /// Cursor position reported since the last call, if any.
    pub fn take_cursor_change(&self) -> Option<Position> {
        self.cursor_moved.take()
    }

    fn set_focus(&mut self, id: Option<WidgetId>, now: Instant) {
        let FocusChange { lost, gained } = self.widgets.set_focus(id);
        if lost == Some(self.editor_id) {
            self.editor.focus_out();
        }
        if gained == Some(self.editor_id) {
            self.editor.focus_in(now);
        }
    }

    pub fn handle_input(&mut self, input: &InputEvent, now: Instant) -> LoopControl {
        match input {
            InputEvent::CtrlC => LoopControl::Break {
                reason: ShutdownReason::CtrlC,
            },
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Resize(w, h) => {
                self.resize(*w, *h);
                LoopControl::Continue
            }
            InputEvent::FocusGained => {
                self.set_focus(Some(self.editor_id), now);
                LoopControl::Continue
            }
            InputEvent::FocusLost => {
                self.set_focus(None, now);
                LoopControl::Continue
            }
            InputEvent::Mouse(mouse) => {
                self.handle_mouse(mouse, now);
                LoopControl::Continue
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LoopControl {
        if is_quit_key(key) {
            return LoopControl::Break {
                reason: ShutdownReason::Quit,
            };
        }
        if self.widgets.focused() != Some(self.editor_id) {
            return LoopControl::Continue;
        }
        if !self.editor.keydown(key) {
            self.handle_unbound_key(key);
        }
        LoopControl::Continue
    }

    /// Page keys scroll the view without moving the cursor.
    fn handle_unbound_key(&mut self, key: &KeyEvent) {
        if !key.mods.is_empty() {
            trace!(target: "runtime.input", key = %key, "key_unbound");
            return;
        }
        match key.code {
            KeyCode::PageDown => {
                self.editor.scroll_by_pages(Orientation::Vertical, 1);
            }
            KeyCode::PageUp => {
                self.editor.scroll_by_pages(Orientation::Vertical, -1);
            }
            _ => trace!(target: "runtime.input", key = %key, "key_unbound"),
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        let point = Point::new(mouse.column as i32, mouse.row as i32);
        if self.widgets.hit_test(point) != Some(self.editor_id) {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down => {
                self.set_focus(Some(self.editor_id), now);
                let origin = self
                    .widgets
                    .window_rect(self.editor_id)
                    .map(|r| r.origin())
                    .unwrap_or_default();
                self.editor
                    .mouse_down(Point::new(point.x - origin.x, point.y - origin.y));
            }
            MouseEventKind::ScrollUp => {
                self.editor.scroll_by(Orientation::Vertical, -1);
            }
            MouseEventKind::ScrollDown => {
                self.editor.scroll_by(Orientation::Vertical, 1);
            }
            MouseEventKind::ScrollLeft => {
                self.editor.scroll_by(Orientation::Horizontal, -1);
            }
            MouseEventKind::ScrollRight => {
                self.editor.scroll_by(Orientation::Horizontal, 1);
            }
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let bounds = Rect::new(0, 0, width as i32, height as i32);
        self.widgets.set_relative_rect(self.window, bounds);
        self.widgets.set_relative_rect(self.editor_id, bounds);
        self.editor.resize(Size::new(width as i32, height as i32));
        self.surface.resize(width, height);
        debug!(target: "runtime", width, height, "resized");
    }

    pub fn handle_tick(&mut self, now: Instant) {
        self.editor.poll_timer(now);
    }

    /// Paint pending damage and queue changed rows. Returns true if anything
    /// was queued.
    pub fn paint(&mut self, writer: &mut Writer) -> bool {
        let rects = self.editor.take_damage_rects();
        for rect in &rects {
            self.surface.reset_state();
            self.editor.paint(&mut self.surface, *rect);
        }
        let origin = self
            .widgets
            .window_rect(self.editor_id)
            .map(|r| (r.x.max(0) as u16, r.y.max(0) as u16))
            .unwrap_or((0, 0));
        let before = writer.is_empty();
        self.surface.emit(writer, origin);
        if !rects.is_empty() {
            trace!(target: "render.paint", rects = rects.len(), "frame_painted");
        }
        before && !writer.is_empty()
    }

    /// Repaint everything (after a terminal clear).
    pub fn invalidate(&mut self) {
        self.surface.mark_all_dirty();
    }
}
