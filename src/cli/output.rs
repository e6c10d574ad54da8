//! Formatted command output
//!
//! Commands report through `tracing` events. While a command runs, a
//! subscriber built by [`CommandOutputProvider::scope`] renders each event as a
//! single `<caption>: <message>` line:
//!
//! | Event | Caption |
//! |---|---|
//! | `trace!` | `debug` |
//! | `debug!` | `verbose` |
//! | `info!` | `info` |
//! | `warn!` | `warn` |
//! | `error!` | `fail` |
//! | `error!(critical = true, ..)` | `critical` |

use crate::unit::RuntimeEnvironment;
use colored::{Color, Colorize};
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

/// In-memory destination for command output.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum OutputSink {
    Stdout,
    Captured(CapturedOutput),
}

impl<'a> MakeWriter<'a> for OutputSink {
    type Writer = Box<dyn Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            OutputSink::Stdout => Box::new(io::stdout()),
            OutputSink::Captured(output) => Box::new(output.clone()),
        }
    }
}

/// Where command output goes, how verbose it is, and whether it is coloured.
#[derive(Debug, Clone)]
pub struct CommandOutputProvider {
    level: LevelFilter,
    use_color: bool,
    sink: OutputSink,
}

impl CommandOutputProvider {
    /// Writes to standard output, coloured when `runtime` reports a terminal.
    pub fn new(runtime: &dyn RuntimeEnvironment) -> Self {
        Self {
            level: LevelFilter::INFO,
            use_color: runtime.is_terminal(),
            sink: OutputSink::Stdout,
        }
    }

    /// Writes uncoloured output into `output`.
    pub fn captured(output: CapturedOutput) -> Self {
        Self {
            level: LevelFilter::INFO,
            use_color: false,
            sink: OutputSink::Captured(output),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.level
    }

    pub fn set_log_level(&mut self, level: LevelFilter) {
        self.level = level;
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Writes `text` unformatted, bypassing the log level.
    pub fn write_raw(&self, text: &str) -> io::Result<()> {
        let mut writer = self.sink.make_writer();
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }

    /// Runs `f` with this provider receiving the current thread's events.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_writer(self.sink.clone())
            .event_format(CommandOutputFormat {
                use_color: self.use_color,
            })
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

struct CommandOutputFormat {
    use_color: bool,
}

impl<S, N> FormatEvent<S, N> for CommandOutputFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = CommandEvent::default();
        event.record(&mut fields);

        let (caption, color) = caption(*event.metadata().level(), fields.critical);
        if self.use_color {
            write!(writer, "{}", caption.color(color))?;
        } else {
            writer.write_str(caption)?;
        }
        writeln!(writer, ": {}", fields.message)
    }
}

fn caption(level: Level, critical: bool) -> (&'static str, Color) {
    match level {
        Level::TRACE => ("debug", Color::Magenta),
        Level::DEBUG => ("verbose", Color::Magenta),
        Level::INFO => ("info", Color::Green),
        Level::WARN => ("warn", Color::Yellow),
        _ if critical => ("critical", Color::Red),
        _ => ("fail", Color::Red),
    }
}

#[derive(Default)]
struct CommandEvent {
    message: String,
    critical: bool,
}

impl Visit for CommandEvent {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "critical" {
            self.critical = value;
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        }
    }
}
