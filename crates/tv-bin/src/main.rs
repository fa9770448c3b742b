//! textview entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, TickEventSource};
use core_render::Writer;
use core_terminal::{CrosstermBackend, TerminalBackend};
use core_text::normalize_line_endings;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod app;
use app::{App, LoopControl, ShutdownReason};

/// Tick period driving the blink timer; bounds blink jitter.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "textview", version, about = "Read-only text viewer")]
struct Args {
    /// Optional path to open at startup (UTF-8 text). If omitted the view starts empty.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `textview.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    app: App,
    title: String,
    terminal_guard: core_terminal::TerminalGuard<'a>,
}

struct Document {
    text: String,
    name: String,
    path: Option<PathBuf>,
    open_failed: bool,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        let args = Args::parse();
        let doc = Self::load_document(&args);
        let config = load_from(args.config.clone())?;

        let title = format!("textview - {}", doc.name);
        self.backend.set_title(&title)?;
        let size = self.backend.size()?;
        let guard = self.backend.enter_guard()?;

        let path_str = doc.path.as_ref().map(|p| p.to_string_lossy().to_string());
        info!(
            target: "runtime.startup",
            path = path_str.as_deref(),
            open_failed = doc.open_failed,
            config_override = args.config.is_some(),
            width = size.0,
            height = size.1,
            "bootstrap_complete"
        );

        let app = App::new(&doc.text, &config, size, Instant::now());
        Ok(RuntimeContext {
            app,
            title,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("textview.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "textview.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    /// Read the file named on the command line. Failures are logged and the
    /// view starts empty.
    fn load_document(args: &Args) -> Document {
        let Some(path) = args.path.as_ref() else {
            return Document {
                text: String::new(),
                name: "untitled".to_string(),
                path: None,
                open_failed: false,
            };
        };
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let size_bytes = content.len();
                let text = normalize_line_endings(&content);
                let line_count = text.split('\n').count();
                tracing::debug!(target: "io", file = %path.display(), size_bytes, line_count, "file_read_ok");
                Document {
                    text,
                    name,
                    path: Some(path.clone()),
                    open_failed: false,
                }
            }
            Err(e) => {
                error!(target: "io", ?e, file = %path.display(), "file_open_error");
                Document {
                    text: String::new(),
                    name,
                    path: Some(path.clone()),
                    open_failed: true,
                }
            }
        }
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

struct EditorRuntime<'a> {
    app: App,
    title: String,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: tokio::task::JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
        source_handles: Vec<tokio::task::JoinHandle<()>>,
    ) -> Self {
        let RuntimeContext {
            app,
            title,
            terminal_guard,
        } = context;
        Self {
            app,
            title,
            rx,
            tx: Some(tx),
            source_handles,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.render();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let now = Instant::now();
            let control = match &event {
                Event::Input(input) => {
                    let control = self.app.handle_input(input, now);
                    if matches!(input, core_events::InputEvent::Resize(..)) {
                        self.clear_terminal();
                        self.app.invalidate();
                    }
                    control
                }
                Event::Tick => {
                    self.app.handle_tick(now);
                    LoopControl::Continue
                }
                Event::RenderRequested => {
                    self.app.invalidate();
                    LoopControl::Continue
                }
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };

            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue => {
                    self.update_title();
                    self.render();
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn clear_terminal(&mut self) {
        if let Err(e) = self.terminal_guard.backend().clear() {
            warn!(target: "terminal", ?e, "clear_failed");
        }
    }

    fn update_title(&mut self) {
        let Some(pos) = self.app.take_cursor_change() else {
            return;
        };
        let title = format!("{} ({}:{})", self.title, pos.line + 1, pos.column + 1);
        if let Err(e) = self.terminal_guard.backend().set_title(&title) {
            trace!(target: "terminal", ?e, "set_title_failed");
        }
    }

    fn render(&mut self) {
        let mut writer = Writer::new();
        if !self.app.paint(&mut writer) {
            return;
        }
        match writer.flush() {
            Ok((prints, cells)) => {
                trace!(target: "render.writer", prints, cells, "frame_flushed");
            }
            Err(e) => error!(target: "render.writer", ?e, "flush_failed"),
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Err(err) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Err(err) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
            }
        }

        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    let context = startup.run()?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(TICK_INTERVAL));
    let source_handles = registry.spawn_all(&tx);

    let mut runtime =
        EditorRuntime::new(context, tx, rx, input_task, input_shutdown, source_handles);
    runtime.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[tokio::test]
    async fn bounded_channel_capacity_blocking() {
        // Tiny channel to exercise pending send; we manually receive to free space.
        let (tx, mut rx) = mpsc::channel::<Event>(2);
        tx.send(Event::Tick).await.unwrap();
        tx.send(Event::Tick).await.unwrap();
        let tx2 = tx.clone();
        let send_fut = tokio::spawn(async move {
            tx2.send(Event::RenderRequested).await.unwrap();
        });
        tokio::task::yield_now().await;
        rx.recv().await.unwrap();
        send_fut.await.unwrap();
        assert!(rx.recv().await.is_some());
    }

    #[test]
    fn load_document_normalizes_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"one\r\ntwo\r\n")
            .unwrap();
        let args = Args {
            path: Some(path),
            config: None,
        };
        let doc = AppStartup::load_document(&args);
        assert_eq!(doc.text, "one\ntwo\n");
        assert_eq!(doc.name, "crlf.txt");
        assert!(!doc.open_failed);
    }

    #[test]
    fn load_document_missing_file_starts_empty() {
        let args = Args {
            path: Some(PathBuf::from("definitely/not/here.txt")),
            config: None,
        };
        let doc = AppStartup::load_document(&args);
        assert!(doc.open_failed);
        assert!(doc.text.is_empty());
    }
}
