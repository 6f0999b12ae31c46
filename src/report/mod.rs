//! Reporting
//!
//! Human-facing progress and error text produced during a backup. Distinct
//! from diagnostic logging (see [`crate::logging`]): reports go to the sinks
//! the user registered, each with its own verbosity threshold.

pub mod console;
pub mod log_file;

pub use console::ConsoleReporter;
pub use log_file::LogFileReporter;

use crate::error::BackupError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Report verbosity, ordered from quietest to loudest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Verbose,
    #[default]
    Info,
    Warn,
    Error,
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Verbose => "verbose",
            Verbosity::Info => "info",
            Verbosity::Warn => "warn",
            Verbosity::Error => "error",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "verbose" => Ok(Verbosity::Verbose),
            "info" => Ok(Verbosity::Info),
            "warn" => Ok(Verbosity::Warn),
            "error" => Ok(Verbosity::Error),
            other => Err(format!(
                "Invalid verbosity: {} (must be 'verbose', 'info', 'warn', or 'error')",
                other
            )),
        }
    }
}

/// Sink for report lines.
///
/// Implementations must tolerate concurrent `report` calls.
pub trait Reporter: Send + Sync {
    fn report(&self, message: &str, level: Verbosity);

    /// Push buffered output to its destination
    fn flush(&self) -> Result<(), BackupError> {
        Ok(())
    }
}

/// Prepends a fixed prefix to every message before forwarding it
pub struct PrefixedReporter<'a> {
    inner: &'a dyn Reporter,
    prefix: String,
}

impl<'a> PrefixedReporter<'a> {
    pub fn new(inner: &'a dyn Reporter, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }
}

impl Reporter for PrefixedReporter<'_> {
    fn report(&self, message: &str, level: Verbosity) {
        self.inner.report(&format!("{}{}", self.prefix, message), level);
    }
}

/// Fans every message out to a set of sinks
#[derive(Default)]
pub struct MergedReporter {
    sinks: Vec<Box<dyn Reporter>>,
}

impl MergedReporter {
    pub fn new(sinks: Vec<Box<dyn Reporter>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Reporter for MergedReporter {
    fn report(&self, message: &str, level: Verbosity) {
        for sink in &self.sinks {
            sink.report(message, level);
        }
    }

    /// Flushes every sink; the first failure is returned after all were tried
    fn flush(&self) -> Result<(), BackupError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                tracing::warn!(error = %e, "Failed to flush report sink");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Persisted description of a report sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportSinkConfig {
    /// Buffered lines appended to a file on flush
    LogFile {
        path: PathBuf,
        #[serde(default)]
        level: Verbosity,
    },
    /// Lines printed to stdout as they arrive
    Console {
        #[serde(default)]
        level: Verbosity,
    },
}

impl ReportSinkConfig {
    pub const TYPES: &'static [&'static str] = &["log_file", "console"];

    pub fn type_name(&self) -> &'static str {
        match self {
            ReportSinkConfig::LogFile { .. } => "log_file",
            ReportSinkConfig::Console { .. } => "console",
        }
    }

    pub fn level(&self) -> Verbosity {
        match self {
            ReportSinkConfig::LogFile { level, .. } | ReportSinkConfig::Console { level } => *level,
        }
    }

    pub fn build(&self) -> Box<dyn Reporter> {
        match self {
            ReportSinkConfig::LogFile { path, level } => {
                Box::new(LogFileReporter::new(path.clone(), *level))
            }
            ReportSinkConfig::Console { level } => Box::new(ConsoleReporter::new(*level)),
        }
    }
}
