//! Registry file source: the TOML file read and written by the command surface

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::{File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Add the registry file to the builder. A missing file is not an error.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    if !path.exists() {
        debug!(config_path = %path.display(), "Registry file not found, using defaults");
    }
    builder.add_source(
        File::from(path.to_path_buf())
            .format(FileFormat::Toml)
            .required(false),
    )
}
