//! Archive service: one `put` merges a root set into one archive location.

use crate::archive::{expand_location_today, ArchiveFormat, ArchiveState, Reconciled};
use crate::error::{ArchiveError, BackupError, TraversalError};
use crate::report::{Reporter, Verbosity};
use crate::traverse::{list_children, read_content, resolve, traverse, TraversalStats, Visitor};
use crate::types::{Node, NodeKind};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persisted description of an archive service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArchiveServiceConfig {
    Bundle { location: String },
    Tar { location: String },
}

impl ArchiveServiceConfig {
    pub const TYPES: &'static [&'static str] = &["bundle", "tar"];

    /// Build a config from a type tag as typed on the command line
    pub fn from_type(type_name: &str, location: String) -> Result<Self, BackupError> {
        match type_name {
            "bundle" => Ok(ArchiveServiceConfig::Bundle { location }),
            "tar" => Ok(ArchiveServiceConfig::Tar { location }),
            other => Err(BackupError::UnknownServiceType(other.to_string())),
        }
    }

    pub fn format(&self) -> ArchiveFormat {
        match self {
            ArchiveServiceConfig::Bundle { .. } => ArchiveFormat::Bundle,
            ArchiveServiceConfig::Tar { .. } => ArchiveFormat::Tar,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.format().as_str()
    }

    pub fn location(&self) -> &str {
        match self {
            ArchiveServiceConfig::Bundle { location } | ArchiveServiceConfig::Tar { location } => {
                location
            }
        }
    }

    pub fn build(&self) -> ArchiveService {
        ArchiveService::new(self.format(), self.location())
    }
}

/// Result of one successful `put`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutSummary {
    pub location: PathBuf,
    /// Entries in the archive after the merge
    pub entries: usize,
    pub inserted: usize,
    pub updated: usize,
    pub traversal: TraversalStats,
}

/// Merges filesystem content into a single archive location
#[derive(Debug, Clone)]
pub struct ArchiveService {
    format: ArchiveFormat,
    location: String,
}

impl ArchiveService {
    /// `location` may contain `{date.*}` placeholders
    pub fn new(format: ArchiveFormat, location: impl Into<String>) -> Self {
        Self {
            format,
            location: location.into(),
        }
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Location for a backup taken today
    pub fn resolve_location(&self) -> PathBuf {
        expand_location_today(&self.location)
    }

    /// Merge everything reachable from `paths` into today's archive location
    pub async fn put(
        &self,
        paths: &[PathBuf],
        reporter: &dyn Reporter,
    ) -> Result<PutSummary, BackupError> {
        let location = self.resolve_location();
        self.put_at(paths, &location, reporter).await
    }

    /// Merge into an explicit archive location.
    ///
    /// The archive is written only after the traversal drained without error;
    /// on failure the file at `location` is left untouched.
    pub async fn put_at(
        &self,
        paths: &[PathBuf],
        location: &Path,
        reporter: &dyn Reporter,
    ) -> Result<PutSummary, BackupError> {
        reporter.report(
            &format!("Backing up files to: {}", location.display()),
            Verbosity::Info,
        );

        // Decode and encode block; they stay off the async workers
        let format = self.format;
        let source = location.to_path_buf();
        let state = tokio::task::spawn_blocking(move || format.open(&source))
            .await
            .map_err(blocking_task_failed)??;
        debug!(
            location = %location.display(),
            existing_entries = state.len(),
            "Opened archive"
        );

        for path in paths {
            reporter.report(&format!("Adding: {}", path.display()), Verbosity::Info);
        }

        let visitor = MergeVisitor::new(state, reporter);
        let traversal = traverse(paths.to_vec(), &visitor).await?;
        let merged = visitor.into_inner();

        let target = location.to_path_buf();
        let archive = merged.archive;
        let archive = tokio::task::spawn_blocking(move || {
            format.persist(&archive, &target).map(|()| archive)
        })
        .await
        .map_err(blocking_task_failed)??;
        reporter.report(
            &format!("File written to: {}", location.display()),
            Verbosity::Info,
        );
        info!(
            location = %location.display(),
            inserted = merged.inserted,
            updated = merged.updated,
            visited = traversal.visited,
            "Backup put complete"
        );

        Ok(PutSummary {
            location: location.to_path_buf(),
            entries: archive.len(),
            inserted: merged.inserted,
            updated: merged.updated,
            traversal,
        })
    }
}

/// A panicked or cancelled blocking archive task surfaces as an I/O error
fn blocking_task_failed(e: tokio::task::JoinError) -> ArchiveError {
    ArchiveError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

struct MergeState {
    archive: ArchiveState,
    inserted: usize,
    updated: usize,
}

impl MergeState {
    fn record(&mut self, outcome: Reconciled) {
        match outcome {
            Reconciled::Inserted => self.inserted += 1,
            Reconciled::Updated => self.updated += 1,
        }
    }
}

/// Visitor that reconciles each node into the archive state.
///
/// The lock is held only for the in-memory reconcile, never across a read.
struct MergeVisitor<'a> {
    state: Mutex<MergeState>,
    reporter: &'a dyn Reporter,
}

impl<'a> MergeVisitor<'a> {
    fn new(archive: ArchiveState, reporter: &'a dyn Reporter) -> Self {
        Self {
            state: Mutex::new(MergeState {
                archive,
                inserted: 0,
                updated: 0,
            }),
            reporter,
        }
    }

    fn into_inner(self) -> MergeState {
        self.state.into_inner()
    }
}

#[async_trait]
impl Visitor for MergeVisitor<'_> {
    async fn visit(&self, node: Node) -> Result<Vec<PathBuf>, TraversalError> {
        self.reporter.report(
            &format!("Archiving {}: {}", node.kind.as_str(), node.path.display()),
            Verbosity::Verbose,
        );

        match node.kind {
            NodeKind::File => {
                let content = read_content(&node.path).await?;
                let mut state = self.state.lock();
                let outcome = state.archive.reconcile(&node.path, content);
                state.record(outcome);
                Ok(Vec::new())
            }
            NodeKind::Symlink => {
                let target = match node.target {
                    Some(target) => target,
                    None => resolve(&node.path).await?,
                };
                let mut state = self.state.lock();
                let outcome = state.archive.reconcile_symlink(&node.path, &target);
                state.record(outcome);
                Ok(vec![target])
            }
            NodeKind::Directory => list_children(&node.path).await,
        }
    }

    fn skipped(&self, path: &Path) {
        self.reporter.report(
            &format!("Skipping already visited: {}", path.display()),
            Verbosity::Verbose,
        );
    }
}
