//! File-backed logging for qradar-health
//!
//! A [`Logger`] owns a `tracing` dispatcher that appends to a single log
//! file. It is never installed as the global default; callers scope work
//! to it explicitly, either with [`Logger::in_scope`] or by attaching
//! [`Logger::dispatch`] to a future.

use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::error::LoggingError;

/// Log file written in the working directory
pub const LOG_FILENAME: &str = "error.log";

/// Handle to the process log sink
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    path: PathBuf,
    level: LevelFilter,
}

impl Logger {
    /// Open [`LOG_FILENAME`] for appending
    ///
    /// # Arguments
    /// * `debug` - log at DEBUG and above when true, otherwise ERROR only
    ///
    /// # Errors
    /// Returns an error if the log file cannot be opened
    pub fn setup(debug: bool) -> Result<Self, LoggingError> {
        Self::to_file(LOG_FILENAME, debug)
    }

    /// Open an arbitrary log file for appending
    pub fn to_file<P: AsRef<Path>>(path: P, debug: bool) -> Result<Self, LoggingError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggingError::OpenFile {
                path: path.clone(),
                source,
            })?;

        let level = level_for(debug);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .event_format(LogLineFormat)
            .with_writer(Mutex::new(file))
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            path,
            level,
        })
    }

    /// Dispatcher to attach to futures via `WithSubscriber`
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Most verbose level that reaches the file
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Run `f` with this logger as the current dispatcher
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("level", &self.level)
            .finish()
    }
}

fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::ERROR
    }
}

/// `<timestamp> - <LEVEL> - <message> [key=value ...]`
struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        SystemTime.format_time(&mut writer)?;
        write!(writer, " - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
