//! Shared helpers for the integration tests

#![allow(dead_code)]

use levellog::{LogLevel, Logger, LoggerConfig};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Route the logger's own diagnostics to the test output.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("levellog=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// In-memory console stream.
#[derive(Clone, Default)]
pub struct Console(Arc<Mutex<Vec<u8>>>);

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Console {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

/// Console + file logger writing to `path`, console captured.
pub fn file_logger(console: LogLevel, file: LogLevel, path: &Path) -> (Logger, Console) {
    init_test_logging();
    let mut logger = Logger::from_config(LoggerConfig::new(console, file, path)).unwrap();
    let out = Console::default();
    logger.set_console_writer(Box::new(out.clone()));
    (logger, out)
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
