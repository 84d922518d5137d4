// levellog/src/lib.rs
//! Leveled, timestamped text logging to the console and an optional append-only
//! file, with size-triggered rotation to `<path>.old`.
//!
//! A [`Logger`] is driven through `&mut self` and does no locking of its own.
//! Sharing one instance across threads is the caller's job, e.g. `Arc<Mutex<Logger>>`
//! around every call.

pub mod config;
pub mod error;
pub mod format;
pub mod log_domain;
pub mod palette;
pub mod proto;
pub mod writer;

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use tracing::{debug, trace, warn};

pub use crate::config::LoggerConfig;
pub use crate::error::{LoggerError, Result};
pub use crate::log_domain::{level_name, LogLevel, ParseLevelError};
pub use crate::palette::ColorPalette;
pub use crate::proto::{DEFAULT_TIMESTAMP_FORMAT, MAX_TAGS, MAX_TAG_CHARS};
pub use crate::writer::rotated_path;

use crate::format::{render_line, render_timestamp, Annotations};
use crate::writer::FileSink;

type ErrorHook = Box<dyn FnMut(&LoggerError) + Send>;

/// `logf!(logger, LogLevel::Info, "loaded {} items", n)`
#[macro_export]
macro_rules! logf {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, ::std::format_args!($($arg)+))
    };
}

pub struct Logger {
    console_threshold: LogLevel,
    file_threshold: LogLevel,
    sink: Option<FileSink>,
    file_path: PathBuf,
    timestamp_format: String,
    prefix: String,
    file_logging_enabled: bool,
    include_thread_id: bool,
    include_process_id: bool,
    tags: Vec<String>,
    color_enabled: bool,
    palette: ColorPalette,
    console: Box<dyn Write + Send>,
    write_failures: u64,
    last_error: Option<LoggerError>,
    error_hook: Option<ErrorHook>,
    closed: bool,
}

impl Logger {
    /// Positional constructor. `timestamp_format: None` selects [`DEFAULT_TIMESTAMP_FORMAT`].
    ///
    /// Only an empty `file_path` with file logging enabled is rejected. If the file
    /// cannot be opened the logger is still returned: console output works, file
    /// output is skipped until [`set_file_path`](Self::set_file_path) succeeds, and
    /// the failure is available from [`last_error`](Self::last_error).
    pub fn initialize(
        console_threshold: LogLevel,
        file_threshold: LogLevel,
        file_path: impl AsRef<Path>,
        timestamp_format: Option<&str>,
        file_logging_enabled: bool,
        include_thread_id: bool,
        include_process_id: bool,
    ) -> Result<Self> {
        Self::from_config(LoggerConfig {
            console_threshold,
            file_threshold,
            file_path: file_path.as_ref().to_path_buf(),
            timestamp_format: timestamp_format.map(str::to_string),
            file_logging_enabled,
            include_thread_id,
            include_process_id,
            ..Default::default()
        })
    }

    pub fn from_config(cfg: LoggerConfig) -> Result<Self> {
        if cfg.file_logging_enabled && cfg.file_path.as_os_str().is_empty() {
            return Err(LoggerError::MissingFilePath);
        }

        let mut logger = Self {
            console_threshold: cfg.console_threshold,
            file_threshold: cfg.file_threshold,
            sink: None,
            file_path: cfg.file_path,
            timestamp_format: cfg
                .timestamp_format
                .unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.to_string()),
            prefix: cfg.prefix,
            file_logging_enabled: cfg.file_logging_enabled,
            include_thread_id: cfg.include_thread_id,
            include_process_id: cfg.include_process_id,
            tags: Vec::with_capacity(MAX_TAGS),
            color_enabled: cfg.color_enabled,
            palette: cfg.palette,
            console: Box::new(io::stdout()),
            write_failures: 0,
            last_error: None,
            error_hook: None,
            closed: false,
        };

        if logger.file_logging_enabled {
            // failure is recorded in last_error; the logger stays usable
            let _ = logger.open_sink();
        }
        Ok(logger)
    }

    // ── reconfiguration ─────────────────────────────────────────────────────

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Closes the current file, switches to `path` and opens it in append mode.
    /// On `Err` the logger keeps running without a file sink.
    pub fn set_file_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(mut old) = self.sink.take() {
            if let Err(e) = old.flush() {
                self.record_write_failure(e);
            }
        }
        self.file_path = path.as_ref().to_path_buf();
        debug!(path = %self.file_path.display(), "log file path changed");
        self.open_sink()
    }

    pub fn set_thresholds(&mut self, console: LogLevel, file: LogLevel) {
        self.console_threshold = console;
        self.file_threshold = file;
    }

    /// Not validated; a pattern chrono cannot parse renders an empty timestamp.
    pub fn set_timestamp_format(&mut self, pattern: impl Into<String>) {
        self.timestamp_format = pattern.into();
    }

    pub fn set_file_logging_enabled(&mut self, enabled: bool) {
        self.file_logging_enabled = enabled;
    }

    pub fn set_include_thread_id(&mut self, include: bool) {
        self.include_thread_id = include;
    }

    pub fn set_include_process_id(&mut self, include: bool) {
        self.include_process_id = include;
    }

    pub fn set_color_enabled(&mut self, enabled: bool) {
        self.color_enabled = enabled;
    }

    pub fn set_color_code(&mut self, level: LogLevel, code: impl Into<String>) {
        self.palette.set(level, code);
    }

    pub fn set_palette(&mut self, palette: ColorPalette) {
        self.palette = palette;
    }

    /// Redirects console output (stdout by default).
    pub fn set_console_writer(&mut self, writer: Box<dyn Write + Send>) {
        self.console = writer;
    }

    /// Called with every failure the logger reports.
    pub fn set_error_hook(&mut self, hook: impl FnMut(&LoggerError) + Send + 'static) {
        self.error_hook = Some(Box::new(hook));
    }

    /// Appends a tag, cut to [`MAX_TAG_CHARS`]. Ignored once [`MAX_TAGS`] are held.
    pub fn add_tag(&mut self, tag: &str) {
        if self.tags.len() < MAX_TAGS {
            self.tags.push(tag.chars().take(MAX_TAG_CHARS).collect());
        }
    }

    // ── emission ────────────────────────────────────────────────────────────

    pub fn log(&mut self, level: LogLevel, message: impl fmt::Display) {
        if level < self.console_threshold && level < self.file_threshold {
            return;
        }

        let ts = render_timestamp(&Local::now(), &self.timestamp_format);
        let ann = Annotations::capture(self.include_thread_id, self.include_process_id);
        let message = message.to_string();
        let name = level.as_str();

        // Console gets every message that passed the gate above, even when only the
        // file threshold admitted it. Only the file sink re-checks its own threshold.
        let console_line = if self.color_enabled {
            let label = self.palette.decorate(level, name);
            render_line(&ts, &label, &self.prefix, &ann, &message)
        } else {
            render_line(&ts, name, &self.prefix, &ann, &message)
        };
        let res = writeln!(self.console, "{console_line}").and_then(|_| self.console.flush());
        if let Err(e) = res {
            self.record_write_failure(e);
        }

        if !self.file_logging_enabled {
            return;
        }
        if level < self.file_threshold {
            trace!(%level, threshold = %self.file_threshold, "below file threshold, file line skipped");
            return;
        }
        let res = match self.sink.as_mut() {
            Some(sink) => sink.write_line(&render_line(&ts, name, &self.prefix, &ann, &message)),
            None => {
                trace!(path = %self.file_path.display(), %level, "no open log file, file line skipped");
                return;
            }
        };
        if let Err(e) = res {
            self.record_write_failure(e);
        }
    }

    pub fn log_fmt(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.log(level, args);
    }

    /// Logs `[tag] Timestamp: <ms> ms` at DEBUG and returns the millisecond reading.
    pub fn log_timestamp(&mut self, tag: &str) -> i64 {
        let ms = Utc::now().timestamp_millis();
        self.log(LogLevel::Debug, format_args!("[{tag}] Timestamp: {ms} ms"));
        ms
    }

    // ── rotation / shutdown ─────────────────────────────────────────────────

    /// Moves the file to `<path>.old` and starts a fresh one once it holds at least
    /// `max_size` bytes. Returns whether a rotation happened. Without an open file
    /// this is a no-op. If the rename or reopen fails the file sink is dropped
    /// until the next successful [`set_file_path`](Self::set_file_path).
    pub fn rotate(&mut self, max_size: u64) -> Result<bool> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(false);
        };

        let size = match sink.size() {
            Ok(size) => size,
            Err(source) => {
                let path = sink.path().to_path_buf();
                self.sink = Some(sink);
                return Err(self.report(LoggerError::Rotation { path, source }));
            }
        };
        if size < max_size {
            self.sink = Some(sink);
            return Ok(false);
        }

        match sink.rotate() {
            Ok(fresh) => {
                debug!(path = %self.file_path.display(), size, "log file rotated");
                self.sink = Some(fresh);
                Ok(true)
            }
            Err(source) => Err(self.report(LoggerError::Rotation {
                path: self.file_path.clone(),
                source,
            })),
        }
    }

    /// Flushes and releases the file and clears owned settings. Safe to call twice.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.flush() {
                self.record_write_failure(e);
            }
        }
        if let Err(e) = self.console.flush() {
            self.record_write_failure(e);
        }
        self.file_path = PathBuf::new();
        self.timestamp_format.clear();
        self.prefix.clear();
        self.tags.clear();
        self.closed = true;
    }

    // ── accessors ───────────────────────────────────────────────────────────

    pub fn console_threshold(&self) -> LogLevel {
        self.console_threshold
    }

    pub fn file_threshold(&self) -> LogLevel {
        self.file_threshold
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn file_logging_enabled(&self) -> bool {
        self.file_logging_enabled
    }

    pub fn is_file_open(&self) -> bool {
        self.sink.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Lines that could not be written to either sink.
    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }

    pub fn last_error(&self) -> Option<&LoggerError> {
        self.last_error.as_ref()
    }

    // ── internals ───────────────────────────────────────────────────────────

    fn open_sink(&mut self) -> Result<()> {
        match FileSink::open(&self.file_path) {
            Ok(sink) => {
                self.sink = Some(sink);
                Ok(())
            }
            Err(source) => Err(self.report(LoggerError::OpenLogFile {
                path: self.file_path.clone(),
                source,
            })),
        }
    }

    fn record_write_failure(&mut self, e: io::Error) {
        self.write_failures += 1;
        let _ = self.report(LoggerError::Write { source: e });
    }

    fn report(&mut self, err: LoggerError) -> LoggerError {
        warn!(error = %err, "logger degraded");
        if let Some(hook) = self.error_hook.as_mut() {
            hook(&err);
        }
        self.last_error = Some(err.clone());
        err
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("console_threshold", &self.console_threshold)
            .field("file_threshold", &self.file_threshold)
            .field("file_path", &self.file_path)
            .field("file_open", &self.sink.is_some())
            .field("timestamp_format", &self.timestamp_format)
            .field("prefix", &self.prefix)
            .field("file_logging_enabled", &self.file_logging_enabled)
            .field("tags", &self.tags)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FlushFails;

    impl Write for FlushFails {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "flush failed"))
        }
    }

    fn console_logger(console: LogLevel) -> (Logger, Capture) {
        let mut logger = Logger::from_config(LoggerConfig::console_only(console)).unwrap();
        let cap = Capture::default();
        logger.set_console_writer(Box::new(cap.clone()));
        (logger, cap)
    }

    #[test]
    fn test_missing_path_rejected() {
        let err = Logger::initialize(LogLevel::Info, LogLevel::Info, "", None, true, false, false)
            .unwrap_err();
        assert!(matches!(err, LoggerError::MissingFilePath));
    }

    #[test]
    fn test_open_failure_is_recoverable() {
        let temp = TempDir::new().unwrap();
        let bad = temp.path().join("missing").join("app.log");
        let mut logger =
            Logger::initialize(LogLevel::Debug, LogLevel::Debug, &bad, None, true, false, false)
                .unwrap();
        let cap = Capture::default();
        logger.set_console_writer(Box::new(cap.clone()));

        assert!(!logger.is_file_open());
        assert!(logger.last_error().unwrap().is_open_failure());

        logger.log(LogLevel::Info, "still here");
        assert!(cap.text().contains("still here"));
        assert_eq!(logger.write_failures(), 0);

        let good = temp.path().join("app.log");
        logger.set_file_path(&good).unwrap();
        logger.log(LogLevel::Info, "now on disk");
        assert!(std::fs::read_to_string(&good).unwrap().contains("now on disk"));
    }

    #[test]
    fn test_default_timestamp_format() {
        let logger = Logger::from_config(LoggerConfig::default()).unwrap();
        assert_eq!(logger.timestamp_format(), "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_color_decoration_console_only() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.log");
        let mut logger = Logger::from_config(
            LoggerConfig::new(LogLevel::Debug, LogLevel::Debug, &path).with_colors(true),
        )
        .unwrap();
        let cap = Capture::default();
        logger.set_console_writer(Box::new(cap.clone()));

        logger.log(LogLevel::Error, "boom");
        assert!(cap.text().contains("\x1B[31mERROR\x1B[0m"));
        let file = std::fs::read_to_string(&path).unwrap();
        assert!(file.contains("| ERROR  | boom"));
        assert!(!file.contains('\x1B'));

        logger.set_color_code(LogLevel::Error, "\x1B[35m");
        logger.log(LogLevel::Error, "again");
        assert!(cap.text().contains("\x1B[35mERROR\x1B[0m"));
    }

    #[test]
    fn test_logf_macro_and_prefix() {
        let (mut logger, cap) = console_logger(LogLevel::Debug);
        logger.set_prefix("[MY_APP]");
        logf!(logger, LogLevel::Success, "{} of {} done", 3, 4);
        assert!(cap.text().contains("| SUCCESS [MY_APP] | 3 of 4 done"));
    }

    #[test]
    fn test_annotations() {
        let (mut logger, cap) = console_logger(LogLevel::Debug);
        logger.set_include_process_id(true);
        logger.log(LogLevel::Info, "pid");
        let expected = format!(" | Process ID: {} | pid", std::process::id());
        assert!(cap.text().contains(&expected));
        assert!(!cap.text().contains("Thread ID"));

        logger.set_include_thread_id(true);
        logger.set_include_process_id(false);
        logger.log(LogLevel::Info, "tid");
        let last = cap.text().lines().last().unwrap().to_string();
        assert!(last.contains(" | Thread ID: "));
        assert!(!last.contains("Process ID"));
    }

    #[test]
    fn test_log_timestamp() {
        let (mut logger, cap) = console_logger(LogLevel::Debug);
        let ms = logger.log_timestamp("boot");
        assert!(ms > 0);
        assert!(cap.text().contains(&format!("| DEBUG  | [boot] Timestamp: {ms} ms")));
    }

    #[test]
    fn test_tags_truncated() {
        let (mut logger, _) = console_logger(LogLevel::Debug);
        logger.add_tag("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(logger.tags()[0], "abcdefghijklmnopqrs");
        assert_eq!(logger.tags()[0].chars().count(), MAX_TAG_CHARS);
    }

    #[test]
    fn test_console_write_failure_counted() {
        let (mut logger, _) = console_logger(LogLevel::Debug);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        logger.set_error_hook(move |e| sink.lock().unwrap().push(e.to_string()));
        logger.set_console_writer(Box::new(Broken));

        logger.log(LogLevel::Info, "lost");
        logger.log(LogLevel::Info, "lost again");

        assert_eq!(logger.write_failures(), 2);
        assert!(matches!(logger.last_error(), Some(LoggerError::Write { .. })));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_sink_emits_trace() {
        let temp = TempDir::new().unwrap();
        let bad = temp.path().join("missing").join("app.log");
        let mut logger =
            Logger::from_config(LoggerConfig::new(LogLevel::Debug, LogLevel::Warning, &bad)).unwrap();
        logger.set_console_writer(Box::new(Capture::default()));
        assert!(!logger.is_file_open());

        let events = Capture::default();
        let out = events.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || out.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            logger.log(LogLevel::Info, "below file threshold");
            logger.log(LogLevel::Error, "no file to write");
        });

        let text = events.text();
        assert!(text.contains("below file threshold, file line skipped"));
        assert!(text.contains("no open log file, file line skipped"));
        assert_eq!(logger.write_failures(), 0);
    }

    #[test]
    fn test_close_reports_console_flush_failure() {
        let (mut logger, _) = console_logger(LogLevel::Debug);
        logger.set_console_writer(Box::new(FlushFails));

        logger.close();

        assert_eq!(logger.write_failures(), 1);
        assert!(matches!(logger.last_error(), Some(LoggerError::Write { .. })));
        // second close is a no-op
        logger.close();
        assert_eq!(logger.write_failures(), 1);
    }

    #[test]
    fn test_close_clears_state() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.log");
        let mut logger =
            Logger::from_config(LoggerConfig::new(LogLevel::Info, LogLevel::Info, &path)).unwrap();
        logger.set_prefix("p");
        logger.add_tag("t");

        logger.close();
        assert!(logger.is_closed());
        assert!(!logger.is_file_open());
        assert!(logger.prefix().is_empty());
        assert!(logger.tags().is_empty());
        assert_eq!(logger.file_path(), Path::new(""));
    }
}
