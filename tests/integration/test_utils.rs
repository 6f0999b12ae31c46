//! Shared helpers for integration tests

use packrat::report::{Reporter, Verbosity};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temp dir plus its canonical path, so expected entry names match resolved symlink targets
pub struct Sandbox {
    _dir: TempDir,
    pub root: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        Self { _dir: dir, root }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    #[cfg(unix)]
    pub fn symlink(&self, target: &Path, relative: &str) -> PathBuf {
        let link = self.path(relative);
        std::os::unix::fs::symlink(target, &link).unwrap();
        link
    }
}

/// Reporter that keeps every line it receives
#[derive(Default)]
pub struct CollectingReporter {
    pub lines: Mutex<Vec<(String, Verbosity)>>,
}

impl CollectingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|(m, _)| m.contains(needle))
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, message: &str, verbosity: Verbosity) {
        self.lines.lock().push((message.to_string(), verbosity));
    }
}
