// src/config.rs
use crate::log_domain::LogLevel;
use crate::palette::ColorPalette;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings consumed by [`Logger::from_config`](crate::Logger::from_config).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level written to the console
    pub console_threshold: LogLevel,
    /// Minimum level written to the file
    pub file_threshold: LogLevel,
    pub file_path: PathBuf,
    /// strftime pattern; `None` selects the built-in default
    pub timestamp_format: Option<String>,
    pub file_logging_enabled: bool,
    pub include_thread_id: bool,
    pub include_process_id: bool,
    pub prefix: String,
    /// Decorate console level names with the palette's codes
    pub color_enabled: bool,
    pub palette: ColorPalette,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console_threshold: LogLevel::Debug,
            file_threshold: LogLevel::Info,
            file_path: PathBuf::new(),
            timestamp_format: None,
            file_logging_enabled: false,
            include_thread_id: false,
            include_process_id: false,
            prefix: String::new(),
            color_enabled: false,
            palette: ColorPalette::default(),
        }
    }
}

impl LoggerConfig {
    /// Console + file logging to `file_path` with the given thresholds.
    pub fn new(console: LogLevel, file: LogLevel, file_path: impl Into<PathBuf>) -> Self {
        Self {
            console_threshold: console,
            file_threshold: file,
            file_path: file_path.into(),
            file_logging_enabled: true,
            ..Default::default()
        }
    }

    pub fn console_only(console: LogLevel) -> Self {
        Self { console_threshold: console, ..Default::default() }
    }

    pub fn with_timestamp_format(mut self, pattern: impl Into<String>) -> Self {
        self.timestamp_format = Some(pattern.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_thread_id(mut self, include: bool) -> Self {
        self.include_thread_id = include;
        self
    }

    pub fn with_process_id(mut self, include: bool) -> Self {
        self.include_process_id = include;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.color_enabled = enabled;
        self
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }
}
