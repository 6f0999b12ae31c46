//! Configuration System
//!
//! The registry of what to back up and where: the set of root paths, the
//! named archive services, the named report sinks, and diagnostic logging
//! settings. Loaded through layered sources (defaults, the registry file,
//! environment overrides) and saved back as TOML by the command surface.

use crate::backup::ArchiveServiceConfig;
use crate::error::BackupError;
use crate::logging::LoggingConfig;
use crate::report::ReportSinkConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

mod facade;
mod merge;
mod paths;
mod sources;

pub use facade::ConfigLoader;
pub use paths::{default_config_path, CONFIG_ENV_VAR};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackratConfig {
    /// Absolute root paths registered for backup
    #[serde(default)]
    pub files: BTreeSet<PathBuf>,

    /// Archive services by name
    #[serde(default)]
    pub archives: BTreeMap<String, ArchiveServiceConfig>,

    /// Report sinks by name
    #[serde(default)]
    pub reporters: BTreeMap<String, ReportSinkConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PackratConfig {
    /// Register root paths; returns how many were new
    pub fn add_files<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        paths
            .into_iter()
            .filter(|path| self.files.insert(path.clone()))
            .count()
    }

    /// Unregister root paths; returns how many were present
    pub fn remove_files<'a, I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        paths
            .into_iter()
            .filter(|path| self.files.remove(*path))
            .count()
    }

    pub fn add_archive(
        &mut self,
        name: &str,
        service: ArchiveServiceConfig,
    ) -> Result<(), BackupError> {
        if self.archives.contains_key(name) {
            return Err(BackupError::DuplicateService(name.to_string()));
        }
        self.archives.insert(name.to_string(), service);
        Ok(())
    }

    pub fn remove_archive(&mut self, name: &str) -> Result<ArchiveServiceConfig, BackupError> {
        self.archives
            .remove(name)
            .ok_or_else(|| BackupError::UnknownService(name.to_string()))
    }

    pub fn add_reporter(&mut self, name: &str, sink: ReportSinkConfig) -> Result<(), BackupError> {
        if self.reporters.contains_key(name) {
            return Err(BackupError::DuplicateService(name.to_string()));
        }
        self.reporters.insert(name.to_string(), sink);
        Ok(())
    }

    pub fn remove_reporter(&mut self, name: &str) -> Result<ReportSinkConfig, BackupError> {
        self.reporters
            .remove(name)
            .ok_or_else(|| BackupError::UnknownService(name.to_string()))
    }

    /// Check the registry is usable for a backup run
    pub fn validate(&self) -> Result<(), BackupError> {
        let mut errors = Vec::new();

        for (name, archive) in &self.archives {
            if archive.location().trim().is_empty() {
                errors.push(format!("Archive '{}': location cannot be empty", name));
            }
        }
        for (name, sink) in &self.reporters {
            if let ReportSinkConfig::LogFile { path, .. } = sink {
                if path.as_os_str().is_empty() {
                    errors.push(format!("Reporter '{}': log file path cannot be empty", name));
                }
            }
        }
        for path in &self.files {
            if !path.is_absolute() {
                errors.push(format!("File '{}' is not an absolute path", path.display()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BackupError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }
}
