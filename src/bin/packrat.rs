//! Packrat CLI Binary
//!
//! Command-line interface for registering files, archive services and
//! reporters, and for running a backup.

use clap::Parser;
use packrat::cli::{map_error, Cli, RunContext};
use packrat::config::ConfigLoader;
use packrat::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Packrat CLI starting");

    let mut context = match RunContext::new(cli.config.clone()) {
        Ok(ctx) => {
            info!(config_path = %ctx.config_path().display(), "Registry loaded");
            ctx
        }
        Err(e) => {
            error!("Error loading registry: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and the registry file.
/// Precedence: CLI flags override registry file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::resolve_path(cli.config.as_deref())
        .and_then(|path| ConfigLoader::load(&path))
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
