//! CLI presentation: text and json formatters for status and backup results.

use crate::backup::{BackupOutcome, PutSummary};
use crate::cli::output::map_error;
use crate::config::PackratConfig;
use crate::error::BackupError;
use crate::report::ReportSinkConfig;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

/// Registry snapshot for `packrat status`
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStatus {
    pub config_path: String,
    pub files: Vec<String>,
    pub archives: Vec<ArchiveRow>,
    pub reporters: Vec<ReporterRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveRow {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub location: String,
    /// Location a backup taken today would write
    pub resolved: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReporterRow {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

pub fn build_registry_status(config: &PackratConfig, config_path: &Path) -> RegistryStatus {
    RegistryStatus {
        config_path: config_path.display().to_string(),
        files: config.files.iter().map(|p| p.display().to_string()).collect(),
        archives: config
            .archives
            .iter()
            .map(|(name, archive)| ArchiveRow {
                name: name.clone(),
                type_name: archive.type_name().to_string(),
                location: archive.location().to_string(),
                resolved: archive.build().resolve_location().display().to_string(),
            })
            .collect(),
        reporters: config
            .reporters
            .iter()
            .map(|(name, sink)| ReporterRow {
                name: name.clone(),
                type_name: sink.type_name().to_string(),
                level: sink.level().to_string(),
                path: match sink {
                    ReportSinkConfig::LogFile { path, .. } => Some(path.display().to_string()),
                    ReportSinkConfig::Console { .. } => None,
                },
            })
            .collect(),
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn format_status(status: &RegistryStatus, format: &str) -> Result<String, BackupError> {
    match format {
        "json" => serde_json::to_string_pretty(status)
            .map_err(|e| BackupError::ConfigError(format!("Failed to render status: {}", e))),
        "text" => Ok(format_status_text(status)),
        other => Err(BackupError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn format_status_text(status: &RegistryStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Registry")));
    out.push_str(&format!("  Config: {}\n\n", status.config_path));

    out.push_str(&format!("{}\n", format_section_heading("Files")));
    if status.files.is_empty() {
        out.push_str("  (none) Run `packrat add <path>` to register files.\n\n");
    } else {
        for file in &status.files {
            out.push_str(&format!("  {}\n", file));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", format_section_heading("Archives")));
    if status.archives.is_empty() {
        out.push_str("  (none)\n\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Name", "Type", "Location", "Today"]);
        for row in &status.archives {
            table.add_row(vec![
                row.name.clone(),
                row.type_name.clone(),
                row.location.clone(),
                row.resolved.clone(),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    out.push_str(&format!("{}\n", format_section_heading("Reporters")));
    if status.reporters.is_empty() {
        out.push_str("  (none)\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Name", "Type", "Level", "Path"]);
        for row in &status.reporters {
            table.add_row(vec![
                row.name.clone(),
                row.type_name.clone(),
                row.level.clone(),
                row.path.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

fn format_summary_line(name: &str, summary: &PutSummary) -> String {
    format!(
        "  {}: {} entries in {} ({} new, {} updated, {} paths visited)",
        name,
        summary.entries,
        summary.location.display(),
        summary.inserted,
        summary.updated,
        summary.traversal.visited
    )
}

pub fn format_backup_outcome(outcome: &BackupOutcome) -> String {
    let mut out = String::new();
    for (name, summary) in &outcome.succeeded {
        out.push_str(&format_summary_line(name, summary));
        out.push('\n');
    }
    for (name, err) in &outcome.failed {
        out.push_str(&format!("  {}: failed: {}\n", name, map_error(err)));
    }
    out.trim_end().to_string()
}
