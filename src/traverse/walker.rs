//! Level-synchronous breadth-first walker over the path graph

use crate::error::TraversalError;
use crate::traverse::classify::{classify, resolve_root};
use crate::types::Node;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Callback invoked once per newly classified node.
///
/// The returned paths are the node's dependencies; they form part of the
/// next frontier. Implementations must not assume any order between nodes
/// of the same level.
#[async_trait]
pub trait Visitor: Send + Sync {
    async fn visit(&self, node: Node) -> Result<Vec<PathBuf>, TraversalError>;

    /// Called for every frontier path that was already classified earlier
    fn skipped(&self, _path: &Path) {}
}

/// Counters describing one finished traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Distinct paths classified and visited
    pub visited: usize,
    /// Frontier paths dropped because they were already seen
    pub skipped: usize,
    /// Frontier rounds processed
    pub levels: usize,
}

/// Walk the graph reachable from `roots`, visiting each distinct path once.
///
/// Roots are brought into the same resolved form as symlink targets first,
/// so a file reached through an aliased root and through a link is one path.
/// Any classification or visit failure aborts the traversal; the in-flight
/// futures of the current level are dropped with it.
pub async fn traverse<V>(roots: Vec<PathBuf>, visitor: &V) -> Result<TraversalStats, TraversalError>
where
    V: Visitor + ?Sized,
{
    let mut frontier = try_join_all(roots.iter().map(|root| resolve_root(root))).await?;
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut stats = TraversalStats::default();

    while !frontier.is_empty() {
        let mut fresh = Vec::with_capacity(frontier.len());
        for path in frontier {
            if seen.contains(&path) {
                trace!(path = %path.display(), "Skipping already visited path");
                visitor.skipped(&path);
                stats.skipped += 1;
            } else {
                seen.insert(path.clone());
                fresh.push(path);
            }
        }

        debug!(
            level = stats.levels,
            width = fresh.len(),
            seen = seen.len(),
            "Processing frontier"
        );

        let dependencies = try_join_all(fresh.iter().map(|path| async move {
            let node = classify(path).await?;
            visitor.visit(node).await
        }))
        .await?;

        stats.visited += fresh.len();
        stats.levels += 1;
        frontier = dependencies.into_iter().flatten().collect();
    }

    debug!(
        visited = stats.visited,
        skipped = stats.skipped,
        levels = stats.levels,
        "Traversal complete"
    );
    Ok(stats)
}
