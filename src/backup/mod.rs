//! Backup orchestration
//!
//! `service` wires the traversal engine to the archive merge store for one
//! archive location; `run` fans a registered root set out to every
//! configured archive and reports progress to the configured sinks.

pub mod run;
pub mod service;

pub use run::{run_backup, run_backup_with, BackupOutcome};
pub use service::{ArchiveService, ArchiveServiceConfig, PutSummary};
