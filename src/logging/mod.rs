use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const FALLBACK_FILTER: &str = "info";

/// Routes formatted events to the browser console, picking `console.error`,
/// `console.warn`, `console.log` or `console.debug` by level.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ConsoleMakeWriter;

/// Buffers one formatted event and emits it on drop.
pub(crate) struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = take_line(&self.buf) {
            emit(self.level, &line);
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

fn take_line(buf: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buf);
    let line = text.trim_end_matches(['\n', '\r']);
    (!line.is_empty()).then(|| line.to_string())
}

/// Console function an event is written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Log,
    Debug,
}

impl ConsoleMethod {
    fn for_level(level: Level) -> Self {
        match level {
            Level::ERROR => ConsoleMethod::Error,
            Level::WARN => ConsoleMethod::Warn,
            Level::INFO => ConsoleMethod::Log,
            _ => ConsoleMethod::Debug,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let msg = wasm_bindgen::JsValue::from_str(line);
    match ConsoleMethod::for_level(level) {
        ConsoleMethod::Error => web_sys::console::error_1(&msg),
        ConsoleMethod::Warn => web_sys::console::warn_1(&msg),
        ConsoleMethod::Log => web_sys::console::log_1(&msg),
        ConsoleMethod::Debug => web_sys::console::debug_1(&msg),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: Level, line: &str) {
    match ConsoleMethod::for_level(level) {
        ConsoleMethod::Error | ConsoleMethod::Warn => eprintln!("{line}"),
        ConsoleMethod::Log | ConsoleMethod::Debug => println!("{line}"),
    }
}

/// Parses a filter directive, falling back to `info` when it is invalid.
pub(crate) fn parse_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (
            EnvFilter::new(FALLBACK_FILTER),
            Some(format!("invalid log filter {directive:?}: {e}")),
        ),
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(directive: &str) {
    let (filter, problem) = parse_filter(directive);
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_ansi(false)
        .with_writer(ConsoleMakeWriter)
        .try_init()
        .is_ok();

    if let Some(problem) = problem {
        tracing::warn!("{problem}");
    }
    if installed {
        tracing::debug!(filter = directive, "logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[test]
    fn test_take_line_strips_trailing_newline() {
        assert_eq!(take_line(b" INFO app: ready\n").as_deref(), Some(" INFO app: ready"));
        assert_eq!(take_line(b"\r\n"), None);
        assert_eq!(take_line(b""), None);
    }

    #[test]
    fn test_parse_filter_accepts_directives() {
        let (_, problem) = parse_filter("bookmark_panes=debug,warn");
        assert!(problem.is_none());
    }

    #[test]
    fn test_parse_filter_falls_back_on_garbage() {
        let (_, problem) = parse_filter("bookmark_panes=loud");
        assert!(problem.is_some_and(|p| p.contains("bookmark_panes=loud")));
    }

    #[test]
    fn test_untargeted_writer_logs_at_info() {
        let writer = ConsoleMakeWriter.make_writer();
        assert_eq!(writer.level, Level::INFO);
    }

    #[test]
    fn test_console_method_follows_level() {
        assert_eq!(ConsoleMethod::for_level(Level::ERROR), ConsoleMethod::Error);
        assert_eq!(ConsoleMethod::for_level(Level::WARN), ConsoleMethod::Warn);
        assert_eq!(ConsoleMethod::for_level(Level::INFO), ConsoleMethod::Log);
        assert_eq!(ConsoleMethod::for_level(Level::DEBUG), ConsoleMethod::Debug);
        assert_eq!(ConsoleMethod::for_level(Level::TRACE), ConsoleMethod::Debug);
    }

    struct LevelCapture(Arc<Mutex<Vec<Level>>>);

    impl<S: tracing::Subscriber> Layer<S> for LevelCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let writer = ConsoleMakeWriter.make_writer_for(event.metadata());
            if let Ok(mut levels) = self.0.lock() {
                levels.push(writer.level);
            }
        }
    }

    #[test]
    fn test_writer_for_event_takes_its_level() {
        let levels = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(LevelCapture(levels.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("store request failed");
            tracing::error!("store returned a malformed node");
            tracing::info!("loading bookmark tree");
        });
        assert_eq!(*levels.lock().unwrap(), vec![Level::WARN, Level::ERROR, Level::INFO]);
    }
}
