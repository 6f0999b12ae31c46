//! Error types for the packrat archiving system.

use std::path::PathBuf;
use thiserror::Error;

/// Traversal-related errors
///
/// Every variant is fatal to the traversal that raised it.
#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("Failed to inspect {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve symlink {path:?}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported node kind at {0:?} (not a file, directory, or symlink)")]
    UnsupportedNode(PathBuf),
}

/// Archive storage errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to encode archive: {0}")]
    Encode(String),
}

/// Top-level errors surfaced to callers and the CLI
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Traversal failed: {0}")]
    Traversal(#[from] TraversalError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No files registered for backup. Run `packrat add <path>` first.")]
    NoFiles,

    #[error("No archive services configured. Run `packrat service add <name> <type>` first.")]
    NoArchives,

    #[error("No reporting services configured. Run `packrat report add <name> <type>` first.")]
    NoReporters,

    #[error("Service name already exists: {0}")]
    DuplicateService(String),

    #[error("Service not found: {0}")]
    UnknownService(String),

    #[error("Unknown service type: {0}")]
    UnknownServiceType(String),

    #[error("Report sink I/O error: {0}")]
    ReportIo(#[source] std::io::Error),

    #[error("Backup failed for: {}", .0.join(", "))]
    ServicesFailed(Vec<String>),
}

impl From<config::ConfigError> for BackupError {
    fn from(err: config::ConfigError) -> Self {
        BackupError::ConfigError(err.to_string())
    }
}
