//! Core types shared by the traversal engine and the archive store.

use std::fs::Metadata;
use std::path::PathBuf;

/// Kind of a filesystem node, determined without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
}

impl NodeKind {
    /// Classify from `symlink_metadata` output.
    ///
    /// Returns `None` for sockets, FIFOs, devices and anything else.
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Some(NodeKind::Symlink)
        } else if file_type.is_dir() {
            Some(NodeKind::Directory)
        } else if file_type.is_file() {
            Some(NodeKind::File)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
            NodeKind::Symlink => "symlink",
        }
    }
}

/// A classified node handed to a [`crate::traverse::Visitor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Path as it appeared in the frontier (pre-resolution)
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Absolute real path of the link target; only set for symlinks
    pub target: Option<PathBuf>,
}
