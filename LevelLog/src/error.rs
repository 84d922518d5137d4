// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Failures the logger reports through its side channels. None of them is fatal.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("file logging is enabled but no log file path was given")]
    MissingFilePath,

    #[error("cannot open log file {}: {}", .path.display(), .source)]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rotation of {} failed: {}", .path.display(), .source)]
    Rotation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log line: {}", .source)]
    Write {
        #[source]
        source: io::Error,
    },
}

// io::Error is not Clone; keep the kind and the rendered message.
fn copy_io(e: &io::Error) -> io::Error {
    io::Error::new(e.kind(), e.to_string())
}

impl Clone for LoggerError {
    fn clone(&self) -> Self {
        match self {
            Self::MissingFilePath => Self::MissingFilePath,
            Self::OpenLogFile { path, source } => Self::OpenLogFile {
                path: path.clone(),
                source: copy_io(source),
            },
            Self::Rotation { path, source } => Self::Rotation {
                path: path.clone(),
                source: copy_io(source),
            },
            Self::Write { source } => Self::Write {
                source: copy_io(source),
            },
        }
    }
}

impl LoggerError {
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::OpenLogFile { .. })
    }

    pub fn is_rotation_failure(&self) -> bool {
        matches!(self, Self::Rotation { .. })
    }
}
