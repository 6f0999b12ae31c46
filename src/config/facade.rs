//! Config facade: the single entry point for loading and saving the registry.

use super::merge::merge_policy;
use super::sources::{environment, registry_file};
use super::PackratConfig;
use crate::error::BackupError;
use config::Map;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the registry path: explicit flag first, then the default location
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, BackupError> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => super::default_config_path(),
        }
    }

    /// Load the registry at `path` with process environment overrides
    pub fn load(path: &Path) -> Result<PackratConfig, BackupError> {
        Self::load_with_env(path, None)
    }

    /// Load the registry at `path`, taking overrides from `vars` instead of the
    /// process environment when given.
    ///
    /// Precedence (lowest to highest): defaults, registry file, environment.
    pub fn load_with_env(
        path: &Path,
        vars: Option<Map<String, String>>,
    ) -> Result<PackratConfig, BackupError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = registry_file::add_to_builder(builder, path);
        let builder = environment::add_to_builder(builder, vars);

        let config: PackratConfig = builder.build()?.try_deserialize()?;
        debug!(
            config_path = %path.display(),
            files = config.files.len(),
            archives = config.archives.len(),
            reporters = config.reporters.len(),
            "Loaded registry"
        );
        Ok(config)
    }

    /// Write the registry to `path` as TOML, creating parent directories
    pub fn save(config: &PackratConfig, path: &Path) -> Result<(), BackupError> {
        let text = toml::to_string_pretty(config)
            .map_err(|e| BackupError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BackupError::ConfigError(format!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        std::fs::write(path, text).map_err(|e| {
            BackupError::ConfigError(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(config_path = %path.display(), "Saved registry");
        Ok(())
    }
}
