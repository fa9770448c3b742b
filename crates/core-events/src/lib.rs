//! Core event types and async event sources for textview.

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// The event loop uses a bounded mpsc channel sized by `EVENT_CHANNEL_CAP`. Producers (input task,
// tick source) await `send` and therefore see backpressure instead of dropping events. A closed
// channel is the shutdown signal for every producer.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static TICKS_EMITTED: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    RenderRequested,
    /// Periodic monotonic tick used to drive the cursor blink timer.
    Tick,
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Synthetic interrupt (Ctrl-C) surfaced distinctly so the loop can quit
    /// regardless of focus.
    CtrlC,
    FocusGained,
    FocusLost,
    Mouse(MouseEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Logical key codes consumed by higher layers.
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------
// Each source owns one background task that pushes `Event`s into the shared channel and must exit
// promptly once `send` fails (consumer dropped).
// -------------------------------------------------------------------------------------------------

/// Trait implemented by any async event producer.
pub trait AsyncEventSource: Send + 'static {
    /// Human-readable stable identifier (used for logging / diagnostics).
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task. Implementors stop when
    /// `tx.send(..).await` returns Err.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source
    /// receives its own clone of `tx`; the registry is drained so a second
    /// call spawns nothing. During shutdown the caller drops its final sender
    /// before awaiting the handles so sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Emits `Event::Tick` every configured interval. The blink timer polls on
/// each tick, so the interval bounds blink jitter.
pub struct TickEventSource {
    interval: Duration,
}

impl TickEventSource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    CHANNEL_SEND_FAILURES.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    break;
                }
                TICKS_EMITTED.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display() {
        let k = KeyEvent::ctrl(KeyCode::Home);
        let s = format!("{}", k);
        assert!(s.contains("Home"));
        assert!(s.contains("CTRL"));
    }

    #[test]
    fn plain_has_no_modifiers() {
        let k = KeyEvent::plain(KeyCode::Up);
        assert!(k.mods.is_empty());
        assert_eq!(k.code, KeyCode::Up);
    }
}
