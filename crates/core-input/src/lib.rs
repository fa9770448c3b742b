//! Async input service: decodes crossterm events into `core_events` input
//! events and feeds them to the event loop channel.

mod async_service;
pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;

use core_events::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CMods, MouseEvent as CMouseEvent,
    MouseEventKind as CMouseKind,
};
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Keys outside the logical set (function keys, media keys, ...) map to None.
pub(crate) fn map_key_event(key: &CKeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    let mut mods = map_mods(key.modifiers);
    // Shift is already folded into the character itself.
    if matches!(code, KeyCode::Char(_)) {
        mods.remove(KeyModifiers::SHIFT);
    }
    Some(KeyEvent::new(code, mods))
}

pub(crate) fn map_mouse_event(m: &CMouseEvent) -> Option<MouseEvent> {
    let kind = match m.kind {
        CMouseKind::Down(_) => MouseEventKind::Down,
        CMouseKind::ScrollUp => MouseEventKind::ScrollUp,
        CMouseKind::ScrollDown => MouseEventKind::ScrollDown,
        CMouseKind::ScrollLeft => MouseEventKind::ScrollLeft,
        CMouseKind::ScrollRight => MouseEventKind::ScrollRight,
        _ => return None,
    };
    Some(MouseEvent {
        kind,
        column: m.column,
        row: m.row,
        mods: map_mods(m.modifiers),
    })
}
