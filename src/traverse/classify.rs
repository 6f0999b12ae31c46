//! Shallow node classification and the filesystem reads a visitor needs.

use crate::error::TraversalError;
use crate::types::{Node, NodeKind};
use std::path::{Path, PathBuf};

/// Classify a path without following symlinks.
///
/// Symlinks are resolved to their absolute real target as part of
/// classification, so a dangling link fails here.
pub async fn classify(path: &Path) -> Result<Node, TraversalError> {
    let metadata = tokio::fs::symlink_metadata(path)
        .await
        .map_err(|source| TraversalError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

    let kind = NodeKind::from_metadata(&metadata)
        .ok_or_else(|| TraversalError::UnsupportedNode(path.to_path_buf()))?;

    let target = match kind {
        NodeKind::Symlink => Some(resolve(path).await?),
        NodeKind::File | NodeKind::Directory => None,
    };

    Ok(Node {
        path: path.to_path_buf(),
        kind,
        target,
    })
}

/// Resolve a path to its absolute real path, following every link on the way
pub async fn resolve(path: &Path) -> Result<PathBuf, TraversalError> {
    let resolved = tokio::fs::canonicalize(path)
        .await
        .map_err(|source| TraversalError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(dunce::simplified(&resolved).to_path_buf())
}

/// Resolve every directory above `path` but keep its final component, so a
/// root that is itself a symlink is still classified as one
pub async fn resolve_root(path: &Path) -> Result<PathBuf, TraversalError> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(resolve(parent).await?.join(name))
        }
        _ => resolve(path).await,
    }
}

/// List the immediate children of a directory, sorted by path
pub async fn list_children(dir: &Path) -> Result<Vec<PathBuf>, TraversalError> {
    let read_dir_err = |source| TraversalError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_err)?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        children.push(entry.path());
    }

    // read_dir order is platform dependent
    children.sort();
    Ok(children)
}

/// Read a regular file's full content
pub async fn read_content(path: &Path) -> Result<Vec<u8>, TraversalError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| TraversalError::Read {
            path: path.to_path_buf(),
            source,
        })
}
