//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, mutates_registry};
pub use output::map_error;
pub use parse::{Cli, Commands, ReportCommands, ServiceCommands};
pub use presentation::{
    build_registry_status, format_backup_outcome, format_status, RegistryStatus,
};
pub use route::{absolutize, RunContext};
