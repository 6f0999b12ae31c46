//! Registry file location

use crate::error::BackupError;
use std::path::PathBuf;

/// Environment variable that overrides the registry file location
pub const CONFIG_ENV_VAR: &str = "PACKRAT_CONFIG";

const CONFIG_FILE_NAME: &str = ".packrat.toml";

/// Default registry path: `$PACKRAT_CONFIG`, otherwise `~/.packrat.toml`
pub fn default_config_path() -> Result<PathBuf, BackupError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
        .ok_or_else(|| BackupError::ConfigError("Could not determine home directory".to_string()))
}
