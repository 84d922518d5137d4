use crate::proto::ROTATED_SUFFIX;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-mode log file. Every line is flushed as soon as it is written.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    /// Current byte length of the file. Pending data is flushed first; the append
    /// position is left alone.
    pub fn size(&mut self) -> io::Result<u64> {
        self.file.flush()?;
        Ok(self.file.metadata()?.len())
    }

    /// Closes the handle, moves the file to `<path>.old` (replacing any earlier one)
    /// and opens a fresh file at the same path.
    pub fn rotate(self) -> io::Result<FileSink> {
        let FileSink { path, mut file } = self;
        file.flush()?;
        drop(file);

        // replaces any earlier .old; on failure the earlier one is left as it was
        fs::rename(&path, rotated_path(&path))?;
        FileSink::open(&path)
    }
}

/// `<path>.old`
pub fn rotated_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(ROTATED_SUFFIX);
    PathBuf::from(s)
}
