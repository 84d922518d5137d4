// src/palette.rs
use crate::log_domain::LogLevel;
use serde::{Deserialize, Serialize};

pub const ANSI_RESET: &str = "\x1B[0m";

/// Built-in palette, indexed by level: cyan, blue, green, yellow, red.
pub const DEFAULT_COLOR_CODES: [&str; 5] = [
    "\x1B[36m",
    "\x1B[34m",
    "\x1B[32m",
    "\x1B[33m",
    "\x1B[31m",
];

/// Per-level display color codes used to decorate console lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    codes: [String; 5],
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self { codes: DEFAULT_COLOR_CODES.map(String::from) }
    }
}

impl ColorPalette {
    pub fn code(&self, level: LogLevel) -> &str {
        &self.codes[level as usize]
    }

    pub fn set(&mut self, level: LogLevel, code: impl Into<String>) {
        self.codes[level as usize] = code.into();
    }

    pub fn with(mut self, level: LogLevel, code: impl Into<String>) -> Self {
        self.set(level, code);
        self
    }

    /// `<code><text><reset>`; an empty code leaves the text undecorated.
    pub fn decorate(&self, level: LogLevel, text: &str) -> String {
        let code = self.code(level);
        if code.is_empty() {
            return text.to_string();
        }
        format!("{code}{text}{ANSI_RESET}")
    }
}
