//! Log file report sink.
//!
//! Lines are buffered in memory and appended to the file on flush, each
//! stamped with the local time.

use crate::error::BackupError;
use crate::report::{Reporter, Verbosity};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct LogFileReporter {
    path: PathBuf,
    level: Verbosity,
    buffer: Mutex<String>,
}

impl LogFileReporter {
    pub fn new(path: PathBuf, level: Verbosity) -> Self {
        Self {
            path,
            level,
            buffer: Mutex::new(String::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines accepted but not yet flushed
    pub fn pending(&self) -> String {
        self.buffer.lock().clone()
    }

    fn append(&self, bytes: &[u8]) -> Result<(), BackupError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(BackupError::ReportIo)?;
            }
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(BackupError::ReportIo)?;
        file.write_all(bytes).map_err(BackupError::ReportIo)
    }
}

impl Reporter for LogFileReporter {
    fn report(&self, message: &str, level: Verbosity) {
        if level < self.level {
            return;
        }
        let line = format!("{} {}\n", chrono::Local::now().to_rfc2822(), message);
        self.buffer.lock().push_str(&line);
    }

    fn flush(&self) -> Result<(), BackupError> {
        let mut buffer = self.buffer.lock();
        if buffer.is_empty() {
            return Ok(());
        }

        // Lines stay buffered until the append succeeds
        self.append(buffer.as_bytes())?;
        buffer.clear();
        Ok(())
    }
}
