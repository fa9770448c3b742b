//! Painting primitives, editor painting and terminal emission.
//!
//! Exposed components:
//! - `surface`: `PaintSurface` trait and `Color`; painters draw through it and
//!   never touch the terminal.
//! - `paint`: `Paintable` plus the editor/scrollbar paint routines.
//! - `cell_surface`: a `PaintSurface` over a terminal cell grid with wide-glyph
//!   continuations and dirty-row tracking.
//! - `writer`: batched crossterm command queue flushed once per frame.
//!
//! Frame pipeline (terminal host):
//! 1. Drain damage rects from the editor.
//! 2. `Paintable::paint` each rect into the `CellSurface`.
//! 3. `CellSurface::emit` queues dirty rows to a `Writer`, which flushes.

pub mod cell_surface;
pub mod paint;
pub mod surface;
pub mod writer;

pub use cell_surface::{Cell, CellSurface};
pub use paint::{Paintable, paint_editor, paint_scrollbar, visible_lines};
pub use surface::{Color, PaintSurface};
pub use writer::Writer;
