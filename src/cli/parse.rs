//! CLI parse: clap types for packrat. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Packrat CLI - merge files, directories and symlinks into updatable archives
#[derive(Parser)]
#[command(name = "packrat")]
#[command(about = "Merge files, directories and symlinks into updatable archives")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Registry file path (default: $PACKRAT_CONFIG or ~/.packrat.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add files to back up
    Add {
        /// Paths to add
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove files from backup
    Remove {
        /// Paths to remove
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Manage archive services
    Service {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Manage reporting services
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Show registered files, archives and reporters
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Back up now
    Now,
}

#[derive(Subcommand)]
pub enum ServiceCommands {
    /// Add an archive service
    Add {
        /// Name of the archive service
        name: String,
        /// Archive service type (bundle or tar)
        service: String,
        /// Archive location; may contain {date.yyyy}, {date.mm}, {date.dd}.
        /// Prompted for when omitted.
        #[arg(long)]
        location: Option<String>,
    },
    /// Remove an archive service
    Remove {
        /// Name of the archive service
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Add a reporting service
    Add {
        /// Name of the reporting service
        name: String,
        /// Reporting service type (log_file or console)
        service: String,
        /// Log file path for log_file; prompted for when omitted
        #[arg(long)]
        path: Option<PathBuf>,
        /// Minimum verbosity to report (verbose, info, warn, error)
        #[arg(long, default_value = "info")]
        level: String,
    },
    /// Remove a reporting service
    Remove {
        /// Name of the reporting service
        name: String,
    },
}
