//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::BackupError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &BackupError) -> String {
    match e {
        BackupError::ServicesFailed(names) => format!(
            "Backup failed for {} service(s): {}. See the configured reporters for details.",
            names.len(),
            names.join(", ")
        ),
        other => other.to_string(),
    }
}
