//! Backup run: every registered root into every configured archive.

use crate::backup::PutSummary;
use crate::config::PackratConfig;
use crate::error::BackupError;
use crate::report::{MergedReporter, PrefixedReporter, Reporter, Verbosity};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Per-service results of one backup run
#[derive(Debug, Default)]
pub struct BackupOutcome {
    pub succeeded: Vec<(String, PutSummary)>,
    pub failed: Vec<(String, BackupError)>,
}

impl BackupOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Collapse to an error naming every failed service
    pub fn into_result(self) -> Result<Vec<(String, PutSummary)>, BackupError> {
        if self.failed.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(BackupError::ServicesFailed(
                self.failed.into_iter().map(|(name, _)| name).collect(),
            ))
        }
    }
}

/// Root set for a run: the registry file itself (if present) then the registered files
pub fn backup_roots(config: &PackratConfig, config_path: Option<&Path>) -> Vec<PathBuf> {
    let mut roots = Vec::with_capacity(config.files.len() + 1);
    if let Some(path) = config_path {
        if path.exists() {
            roots.push(path.to_path_buf());
        }
    }
    roots.extend(config.files.iter().cloned());
    roots
}

/// Run a backup using the registry's sinks for reporting
pub async fn run_backup(
    config: &PackratConfig,
    config_path: Option<&Path>,
) -> Result<BackupOutcome, BackupError> {
    ensure_runnable(config)?;
    if config.reporters.is_empty() {
        return Err(BackupError::NoReporters);
    }
    let reporter = MergedReporter::new(config.reporters.values().map(|sink| sink.build()).collect());
    let outcome = run_services(config, config_path, &reporter).await;

    // Flush even when a service failed so the error text lands in the sinks
    reporter.flush()?;
    Ok(outcome)
}

/// Run a backup reporting to `reporter`.
///
/// Services run concurrently; one failing service does not stop the others.
pub async fn run_backup_with(
    config: &PackratConfig,
    config_path: Option<&Path>,
    reporter: &dyn Reporter,
) -> Result<BackupOutcome, BackupError> {
    ensure_runnable(config)?;
    Ok(run_services(config, config_path, reporter).await)
}

/// Something to back up and somewhere to put it, with a valid registry
fn ensure_runnable(config: &PackratConfig) -> Result<(), BackupError> {
    if config.files.is_empty() {
        return Err(BackupError::NoFiles);
    }
    if config.archives.is_empty() {
        return Err(BackupError::NoArchives);
    }
    config.validate()
}

async fn run_services(
    config: &PackratConfig,
    config_path: Option<&Path>,
    reporter: &dyn Reporter,
) -> BackupOutcome {
    reporter.report("Backup starting", Verbosity::Info);
    let roots = backup_roots(config, config_path);
    info!(roots = roots.len(), archives = config.archives.len(), "Backup starting");

    let results = join_all(config.archives.iter().map(|(name, service_config)| {
        let roots = &roots;
        async move {
            let prefixed = PrefixedReporter::new(
                reporter,
                format!("{}({}): ", name, service_config.type_name()),
            );
            let result = service_config.build().put(roots, &prefixed).await;
            if let Err(e) = &result {
                error!(service = %name, error = %e, "Archive service failed");
                prefixed.report(
                    &format!("Encountered error during backup: {}", e),
                    Verbosity::Error,
                );
            }
            (name.clone(), result)
        }
    }))
    .await;

    let mut outcome = BackupOutcome::default();
    for (name, result) in results {
        match result {
            Ok(summary) => outcome.succeeded.push((name, summary)),
            Err(e) => outcome.failed.push((name, e)),
        }
    }

    reporter.report("Backup finished", Verbosity::Info);
    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Backup finished"
    );
    outcome
}
