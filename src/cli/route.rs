//! CLI route: single route table and run context. Dispatches to the registry,
//! the backup runner, and presentation.

use crate::backup::{run_backup, ArchiveServiceConfig};
use crate::cli::help::{command_name, mutates_registry};
use crate::cli::parse::{Commands, ReportCommands, ServiceCommands};
use crate::cli::presentation::{build_registry_status, format_backup_outcome, format_status};
use crate::config::{ConfigLoader, PackratConfig};
use crate::error::BackupError;
use crate::report::{ReportSinkConfig, Verbosity};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Runtime context for CLI execution: registry path and the loaded registry.
pub struct RunContext {
    config_path: PathBuf,
    config: PackratConfig,
}

impl RunContext {
    /// Load the registry from `config_path`, or the default location when `None`
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, BackupError> {
        let config_path = ConfigLoader::resolve_path(config_path.as_deref())?;
        let config = ConfigLoader::load(&config_path)?;
        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn from_parts(config_path: PathBuf, config: PackratConfig) -> Self {
        Self {
            config_path,
            config,
        }
    }

    pub fn config(&self) -> &PackratConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Execute a command; registry-changing commands save the registry on success
    pub fn execute(&mut self, command: &Commands) -> Result<String, BackupError> {
        debug!(command = %command_name(command), "Executing command");

        let output = match command {
            Commands::Add { paths } => self.handle_add(paths)?,
            Commands::Remove { paths } => self.handle_remove(paths)?,
            Commands::Service { command } => match command {
                ServiceCommands::Add {
                    name,
                    service,
                    location,
                } => self.handle_service_add(name, service, location.as_deref())?,
                ServiceCommands::Remove { name } => {
                    self.config.remove_archive(name)?;
                    format!("Archive service removed: {}", name)
                }
            },
            Commands::Report { command } => match command {
                ReportCommands::Add {
                    name,
                    service,
                    path,
                    level,
                } => self.handle_report_add(name, service, path.as_deref(), level)?,
                ReportCommands::Remove { name } => {
                    self.config.remove_reporter(name)?;
                    format!("Reporting service removed: {}", name)
                }
            },
            Commands::Status { format } => {
                let status = build_registry_status(&self.config, &self.config_path);
                format_status(&status, format)?
            }
            Commands::Now => self.handle_now()?,
        };

        if mutates_registry(command) {
            ConfigLoader::save(&self.config, &self.config_path)?;
            info!(config_path = %self.config_path.display(), "Registry saved");
        }
        Ok(output)
    }

    fn handle_add(&mut self, paths: &[PathBuf]) -> Result<String, BackupError> {
        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            let absolute = absolutize(path)?;
            if !absolute.exists() {
                warn!(path = %absolute.display(), "Adding path that does not exist yet");
            }
            resolved.push(absolute);
        }
        let added = self.config.add_files(resolved);
        Ok(format!(
            "Added {} file(s); {} registered",
            added,
            self.config.files.len()
        ))
    }

    fn handle_remove(&mut self, paths: &[PathBuf]) -> Result<String, BackupError> {
        let resolved = paths
            .iter()
            .map(|p| absolutize(p))
            .collect::<Result<Vec<_>, _>>()?;
        let removed = self.config.remove_files(&resolved);
        Ok(format!(
            "Removed {} file(s); {} registered",
            removed,
            self.config.files.len()
        ))
    }

    fn handle_service_add(
        &mut self,
        name: &str,
        service: &str,
        location: Option<&str>,
    ) -> Result<String, BackupError> {
        if !ArchiveServiceConfig::TYPES.contains(&service) {
            return Err(BackupError::UnknownServiceType(service.to_string()));
        }
        if self.config.archives.contains_key(name) {
            return Err(BackupError::DuplicateService(name.to_string()));
        }

        let location = match location {
            Some(location) => location.to_string(),
            None => prompt_text("Where would you like to store the archive? (include file extension)")?,
        };
        let location = absolutize(Path::new(&location))?
            .to_string_lossy()
            .into_owned();

        let archive = ArchiveServiceConfig::from_type(service, location)?;
        let message = format!(
            "Archive service added: {} ({} at {})",
            name,
            archive.type_name(),
            archive.location()
        );
        self.config.add_archive(name, archive)?;
        Ok(message)
    }

    fn handle_report_add(
        &mut self,
        name: &str,
        service: &str,
        path: Option<&Path>,
        level: &str,
    ) -> Result<String, BackupError> {
        let level: Verbosity = level.parse().map_err(BackupError::ConfigError)?;
        if self.config.reporters.contains_key(name) {
            return Err(BackupError::DuplicateService(name.to_string()));
        }

        let sink = match service {
            "log_file" => {
                let path = match path {
                    Some(path) => path.to_path_buf(),
                    None => PathBuf::from(prompt_text(
                        "Where would you like to save the logs? (include file extension)",
                    )?),
                };
                ReportSinkConfig::LogFile {
                    path: absolutize(&path)?,
                    level,
                }
            }
            "console" => ReportSinkConfig::Console { level },
            other => return Err(BackupError::UnknownServiceType(other.to_string())),
        };

        let message = format!(
            "Reporting service added: {} ({}, level {})",
            name,
            sink.type_name(),
            level
        );
        self.config.add_reporter(name, sink)?;
        Ok(message)
    }

    fn handle_now(&self) -> Result<String, BackupError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            BackupError::ConfigError(format!("Failed to create async runtime: {}", e))
        })?;
        let outcome = runtime.block_on(run_backup(&self.config, Some(&self.config_path)))?;
        let text = format_backup_outcome(&outcome);
        outcome.into_result()?;
        Ok(format!("Backup finished\n{}", text))
    }
}

fn prompt_text(prompt: &str) -> Result<String, BackupError> {
    use dialoguer::Input;

    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| BackupError::ConfigError(format!("Failed to get user input: {}", e)))
}

/// Make `path` absolute against the current directory and drop `.`/`..` lexically
pub fn absolutize(path: &Path) -> Result<PathBuf, BackupError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| {
                BackupError::ConfigError(format!("Failed to read current directory: {}", e))
            })?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
