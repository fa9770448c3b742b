//! Text view model: geometry, scrollbars, widget arena and the
//! `TextEditor` controller that ties them together.
//!
//! Everything here is host-agnostic. Sizes are in abstract pixels (the
//! terminal binary treats one cell as one pixel); time comes in as `Instant`
//! arguments; redraw requests go out through `Damage`. Rendering lives in
//! `core-render`, input decoding in `core-input`.
//!
//! Core invariants (must hold after every public `TextEditor` call):
//! * The document holds at least one line.
//! * The cursor names an existing line and a column within `0..=len`.
//! * Scroll offsets stay within each scrollbar's range.
//! * A cursor change is reported to observers exactly once, after the view
//!   has scrolled to it.

pub mod blink;
pub mod damage;
pub mod editor;
pub mod geometry;
pub mod movement;
pub mod scrollbar;
pub mod widget;

pub use blink::{BlinkTimer, DEFAULT_BLINK_INTERVAL};
pub use damage::{Damage, DamageTracker};
pub use editor::{CURSOR_WIDTH, EditorOptions, TextEditor};
pub use geometry::{Point, Rect, Size};
pub use movement::Movement;
pub use scrollbar::{Orientation, ScrollBar};
pub use widget::{FocusChange, Focusable, Scrollable, WidgetId, WidgetTree};

use core_text::Position;

/// Receives cursor-change notifications. Called after the new position is
/// stored and scrolled into view.
pub trait EditorObserver {
    fn cursor_changed(&mut self, position: Position);
}

impl<F> EditorObserver for F
where
    F: FnMut(Position),
{
    fn cursor_changed(&mut self, position: Position) {
        self(position)
    }
}
