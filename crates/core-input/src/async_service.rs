//! Terminal input task.
//!
//! One tokio task drains crossterm's `EventStream`, translates each event into
//! an `InputEvent` and forwards it over the bounded runtime channel. The task
//! stops on the shutdown signal, when the runtime drops its receiver, or when
//! the stream ends or fails.

use crate::{map_key_event, map_mouse_event};
use core_events::{CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_TOTAL};
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEventKind as CKind,
    KeyModifiers as CMods,
};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, trace, warn};

/// Handle the runtime keeps to stop the input task.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown(Arc<Notify>);

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.0.notify_one();
    }
}

/// Spawn a Tokio task reading terminal events through `EventStream`.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let notify = Arc::new(Notify::new());
    let shutdown = AsyncInputShutdown(notify.clone());
    let handle = task::spawn(async move {
        forward_input(sender, EventStream::new(), notify).await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    Shutdown,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl StopReason {
    fn as_str(&self) -> &'static str {
        match self {
            StopReason::Shutdown => "shutdown_signal",
            StopReason::ChannelClosed => "channel_closed",
            StopReason::StreamEnded => "stream_ended",
            StopReason::StreamError => "stream_error",
        }
    }
}

/// Forward translated events until something stops the loop.
async fn forward_input<S>(
    sender: Sender<Event>,
    mut stream: S,
    shutdown: Arc<Notify>,
) -> StopReason
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    info!(target: "input.thread", "async_input_task_started");
    let reason = loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.notified() => break StopReason::Shutdown,
            next = stream.next() => next,
        };
        let event = match next {
            None => break StopReason::StreamEnded,
            Some(Err(err)) => {
                warn!(
                    target: "input.thread",
                    error_kind = ?err.kind(),
                    "async_input_task_stream_error"
                );
                break StopReason::StreamError;
            }
            Some(Ok(event)) => event,
        };
        let Some(input) = translate(event) else {
            continue;
        };
        let is_key = matches!(input, InputEvent::Key(_));
        if sender.send(Event::Input(input)).await.is_err() {
            CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            break StopReason::ChannelClosed;
        }
        if is_key {
            KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
        }
    };
    info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    reason
}

/// Viewer-relevant terminal events. Key releases, unmapped keys and
/// mouse drags/moves yield `None`.
fn translate(event: CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) => {
            if !matches!(key.kind, CKind::Press | CKind::Repeat) {
                return None;
            }
            if key.code == CKeyCode::Char('c') && key.modifiers.contains(CMods::CONTROL) {
                trace!(target: "input.event", kind = "ctrl_c");
                return Some(InputEvent::CtrlC);
            }
            let key = map_key_event(&key)?;
            trace!(target: "input.event", kind = "keypress", key = %key);
            Some(InputEvent::Key(key))
        }
        CEvent::Resize(w, h) => {
            trace!(target: "input.event", w, h, "resize");
            Some(InputEvent::Resize(w, h))
        }
        CEvent::FocusGained => {
            trace!(target: "input.event", kind = "focus_gained");
            Some(InputEvent::FocusGained)
        }
        CEvent::FocusLost => {
            trace!(target: "input.event", kind = "focus_lost");
            Some(InputEvent::FocusLost)
        }
        CEvent::Mouse(m) => {
            let mouse = map_mouse_event(&m)?;
            trace!(
                target: "input.event",
                kind = "mouse",
                column = mouse.column,
                row = mouse.row
            );
            Some(InputEvent::Mouse(mouse))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
    use crossterm::event::{
        KeyEvent as CKeyEvent, MouseButton, MouseEvent as CMouseEvent,
        MouseEventKind as CMouseKind,
    };
    use std::sync::Mutex;
    use tokio::sync::{Mutex as TokioMutex, mpsc};
    use tracing::field::{Field, Visit};
    use tracing::{Metadata, Subscriber, subscriber::Interest};
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    static LOG_CAPTURE_GUARD: TokioMutex<()> = TokioMutex::const_new(());

    #[derive(Clone, Default)]
    struct LogCapture {
        events: Arc<Mutex<Vec<CapturedLog>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedLog {
        target: String,
        fields: Vec<(String, String)>,
    }

    #[derive(Default)]
    struct LogVisitor {
        fields: Vec<(String, String)>,
    }

    impl Visit for LogVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S> Layer<S> for LogCapture
    where
        S: Subscriber,
    {
        fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
            Interest::always()
        }

        fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
            metadata.target().starts_with("input.")
        }

        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = LogVisitor::default();
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedLog {
                target: event.metadata().target().to_string(),
                fields: visitor.fields,
            });
        }
    }

    async fn run_scenario(events: Vec<CEvent>) -> Vec<Event> {
        let (tx, mut rx) = mpsc::channel(64);
        let stream = tokio_stream::iter(events.into_iter().map(Ok));
        let reason = forward_input(tx, stream, Arc::new(Notify::new())).await;
        assert_eq!(reason, StopReason::StreamEnded);

        let mut outputs = Vec::new();
        while let Some(evt) = rx.recv().await {
            outputs.push(evt);
        }
        outputs
    }

    fn key(code: CKeyCode, mods: CMods) -> CEvent {
        CEvent::Key(CKeyEvent::new(code, mods))
    }

    #[tokio::test]
    async fn forwards_navigation_keys() {
        let base_total = KEYPRESS_TOTAL.load(Ordering::Relaxed);
        let outputs = run_scenario(vec![
            key(CKeyCode::Down, CMods::NONE),
            key(CKeyCode::End, CMods::CONTROL),
        ])
        .await;

        match outputs.as_slice() {
            [
                Event::Input(InputEvent::Key(a)),
                Event::Input(InputEvent::Key(b)),
            ] => {
                assert_eq!(*a, KeyEvent::plain(KeyCode::Down));
                assert_eq!(*b, KeyEvent::new(KeyCode::End, KeyModifiers::CTRL));
            }
            other => panic!("unexpected output sequence: {other:?}"),
        }
        assert!(KEYPRESS_TOTAL.load(Ordering::Relaxed) - base_total >= 2);
    }

    #[tokio::test]
    async fn release_events_are_dropped() {
        let mut release = CKeyEvent::new(CKeyCode::Up, CMods::NONE);
        release.kind = CKind::Release;
        let outputs = run_scenario(vec![CEvent::Key(release)]).await;
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn forwards_ctrl_c() {
        let outputs = run_scenario(vec![key(CKeyCode::Char('c'), CMods::CONTROL)]).await;
        assert!(matches!(
            outputs.as_slice(),
            [Event::Input(InputEvent::CtrlC)]
        ));
    }

    #[tokio::test]
    async fn forwards_resize_focus_and_mouse() {
        let outputs = run_scenario(vec![
            CEvent::Resize(120, 48),
            CEvent::FocusLost,
            CEvent::FocusGained,
            CEvent::Mouse(CMouseEvent {
                kind: CMouseKind::ScrollDown,
                column: 3,
                row: 7,
                modifiers: CMods::NONE,
            }),
            CEvent::Mouse(CMouseEvent {
                kind: CMouseKind::Up(MouseButton::Left),
                column: 3,
                row: 7,
                modifiers: CMods::NONE,
            }),
        ])
        .await;

        assert_eq!(outputs.len(), 4);
        assert!(matches!(outputs[0], Event::Input(InputEvent::Resize(120, 48))));
        assert!(matches!(outputs[1], Event::Input(InputEvent::FocusLost)));
        assert!(matches!(outputs[2], Event::Input(InputEvent::FocusGained)));
        match &outputs[3] {
            Event::Input(InputEvent::Mouse(m)) => {
                assert_eq!(m.kind, MouseEventKind::ScrollDown);
                assert_eq!((m.column, m.row), (3, 7));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_channel_stops_task() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let stream = tokio_stream::iter(vec![Ok(CEvent::Resize(1, 1)), Ok(CEvent::Resize(2, 2))]);
        let base = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed);
        let reason = forward_input(tx, stream, Arc::new(Notify::new())).await;
        assert_eq!(reason, StopReason::ChannelClosed);
        assert!(CHANNEL_SEND_FAILURES.load(Ordering::Relaxed) > base);
    }

    #[tokio::test]
    async fn shutdown_signal_ends_pending_stream() {
        let (tx, _rx) = mpsc::channel(4);
        let stream = tokio_stream::pending::<io::Result<CEvent>>();
        let notify = Arc::new(Notify::new());
        AsyncInputShutdown(notify.clone()).signal();
        let reason = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            forward_input(tx, stream, notify),
        )
        .await
        .expect("task should stop on shutdown");
        assert_eq!(reason, StopReason::Shutdown);
    }

    #[tokio::test]
    async fn stream_error_stops_task() {
        let (tx, mut rx) = mpsc::channel(4);
        let stream = tokio_stream::iter(vec![
            Ok(CEvent::FocusGained),
            Err(io::Error::other("tty gone")),
            Ok(CEvent::FocusLost),
        ]);
        let reason = forward_input(tx, stream, Arc::new(Notify::new())).await;
        assert_eq!(reason, StopReason::StreamError);
        assert!(matches!(
            rx.recv().await,
            Some(Event::Input(InputEvent::FocusGained))
        ));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn keypress_and_exit_are_logged() {
        let _log_guard = LOG_CAPTURE_GUARD.lock().await;
        let capture = LogCapture::default();
        let events_handle = capture.events.clone();
        let subscriber = Registry::default().with(capture.with_filter(LevelFilter::TRACE));
        let dispatch = tracing::Dispatch::new(subscriber);
        let _guard = tracing::dispatcher::set_default(&dispatch);

        let outputs = run_scenario(vec![key(CKeyCode::Right, CMods::NONE)]).await;
        assert_eq!(outputs.len(), 1);

        let logs = events_handle.lock().unwrap();
        let keypress_log = logs
            .iter()
            .find(|entry| entry.target == "input.event")
            .unwrap_or_else(|| panic!("missing input.event log, captured: {logs:?}"));
        assert!(
            keypress_log
                .fields
                .iter()
                .any(|(k, v)| k == "kind" && v == "\"keypress\"")
        );
        assert!(keypress_log.fields.iter().any(|(k, _)| k == "key"));
        assert!(
            logs.iter()
                .any(|e| e.target == "input.thread"
                    && e.fields.iter().any(|(k, v)| k == "reason" && v == "\"stream_ended\""))
        );
    }
}
