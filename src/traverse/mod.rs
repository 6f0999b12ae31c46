//! Graph Traversal Engine
//!
//! Explores the filesystem as a graph whose edges are "directory contains
//! child" and "symlink resolves to target". Traversal is breadth-first and
//! level-synchronous: every node of one level is classified and visited
//! before any node of the next level is touched.

pub mod classify;
pub mod walker;

pub use classify::{classify, list_children, read_content, resolve, resolve_root};
pub use walker::{traverse, TraversalStats, Visitor};
