//! CLI command-name contract for logging and routing.

use crate::cli::parse::{Commands, ReportCommands, ServiceCommands};

/// Command name string for log events (e.g. "service.add", "now").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Add { .. } => "add".to_string(),
        Commands::Remove { .. } => "remove".to_string(),
        Commands::Service { command } => format!("service.{}", service_command_name(command)),
        Commands::Report { command } => format!("report.{}", report_command_name(command)),
        Commands::Status { .. } => "status".to_string(),
        Commands::Now => "now".to_string(),
    }
}

pub fn service_command_name(command: &ServiceCommands) -> &'static str {
    match command {
        ServiceCommands::Add { .. } => "add",
        ServiceCommands::Remove { .. } => "remove",
    }
}

pub fn report_command_name(command: &ReportCommands) -> &'static str {
    match command {
        ReportCommands::Add { .. } => "add",
        ReportCommands::Remove { .. } => "remove",
    }
}

/// Whether the command rewrites the registry file
pub fn mutates_registry(command: &Commands) -> bool {
    !matches!(command, Commands::Status { .. } | Commands::Now)
}
