//! Batched terminal writer.
//!
//! Painting produces a list of primitive commands which are queued to the
//! terminal in one pass and flushed once.
//!
//! Invariants:
//! * Commands preserve ordering; nothing is flushed mid-frame.
//! * Positions are absolute terminal cells; callers ensure bounds.
//! * Consecutive plain prints between two positioning/colour commands are
//!   coalesced into a single `Print`.
//! * `print_commands <= cells_printed` after any sequence of calls.

use crate::surface::Color;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    SetColors { fg: Color, bg: Color },
    Print(String),
    ResetColor,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
    pending: String,
    colors: Option<(Color, Color)>,
    pub print_commands: u64,
    pub cells_printed: u64,
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let s = std::mem::take(&mut self.pending);
        self.cmds.push(Command::Print(s));
        self.print_commands += 1;
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.flush_pending();
        self.cmds.push(Command::MoveTo(x, y));
    }

    /// Switch colours; repeated requests for the active pair are dropped.
    pub fn set_colors(&mut self, fg: Color, bg: Color) {
        if self.colors == Some((fg, bg)) {
            return;
        }
        self.flush_pending();
        self.colors = Some((fg, bg));
        self.cmds.push(Command::SetColors { fg, bg });
    }

    /// Queue one cell's worth of text.
    pub fn print_cell(&mut self, glyph: &str) {
        if glyph.is_empty() {
            return;
        }
        self.pending.push_str(glyph);
        self.cells_printed += 1;
    }

    pub fn reset_color(&mut self) {
        self.flush_pending();
        self.colors = None;
        self.cmds.push(Command::ResetColor);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty() && self.pending.is_empty()
    }

    /// Finalised command list (testing / diagnostics).
    pub fn into_commands(mut self) -> Vec<Command> {
        self.flush_pending();
        self.cmds
    }

    pub fn flush_to<W: Write>(mut self, out: &mut W) -> Result<(u64, u64)> {
        self.flush_pending();
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => {
                    queue!(out, MoveTo(x, y))?;
                }
                Command::SetColors { fg, bg } => {
                    queue!(
                        out,
                        SetForegroundColor(term_color(fg)),
                        SetBackgroundColor(term_color(bg))
                    )?;
                }
                Command::Print(s) => {
                    queue!(out, Print(s))?;
                }
                Command::ResetColor => {
                    queue!(out, ResetColor)?;
                }
            }
        }
        out.flush()?;
        Ok((self.print_commands, self.cells_printed))
    }

    pub fn flush(self) -> Result<(u64, u64)> {
        let mut out = stdout();
        self.flush_to(&mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_cells_between_color_changes() {
        let mut w = Writer::new();
        w.move_to(0, 0);
        w.set_colors(Color::BLACK, Color::WHITE);
        w.print_cell("a");
        w.print_cell("b");
        w.set_colors(Color::BLACK, Color::WHITE);
        w.print_cell("c");
        w.set_colors(Color::BLACK, Color::RED);
        w.print_cell("d");
        let cmds = w.into_commands();
        assert_eq!(
            cmds,
            vec![
                Command::MoveTo(0, 0),
                Command::SetColors {
                    fg: Color::BLACK,
                    bg: Color::WHITE
                },
                Command::Print("abc".into()),
                Command::SetColors {
                    fg: Color::BLACK,
                    bg: Color::RED
                },
                Command::Print("d".into()),
            ]
        );
    }

    #[test]
    fn flush_to_buffer_counts() {
        let mut w = Writer::new();
        w.move_to(3, 4);
        w.print_cell("x");
        w.print_cell("y");
        w.reset_color();
        let mut buf: Vec<u8> = Vec::new();
        let (prints, cells) = w.flush_to(&mut buf).unwrap();
        assert_eq!(prints, 1);
        assert_eq!(cells, 2);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("xy"));
    }
}
