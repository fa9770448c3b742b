//! Cursor movements and their key bindings.

use core_events::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

impl Movement {
    /// Unmodified arrows / Home / End, and Ctrl+Home / Ctrl+End. Any other
    /// modifier combination is left to the host.
    pub fn from_key(key: &KeyEvent) -> Option<Movement> {
        if key.mods.is_empty() {
            return match key.code {
                KeyCode::Up => Some(Movement::Up),
                KeyCode::Down => Some(Movement::Down),
                KeyCode::Left => Some(Movement::Left),
                KeyCode::Right => Some(Movement::Right),
                KeyCode::Home => Some(Movement::LineStart),
                KeyCode::End => Some(Movement::LineEnd),
                _ => None,
            };
        }
        if key.mods == KeyModifiers::CTRL {
            return match key.code {
                KeyCode::Home => Some(Movement::DocumentStart),
                KeyCode::End => Some(Movement::DocumentEnd),
                _ => None,
            };
        }
        None
    }
}
