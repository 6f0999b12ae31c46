//! Packrat: Filesystem-to-Archive Merging
//!
//! Materializes an arbitrary set of filesystem paths (files, directories and
//! symlinks, possibly cyclic or overlapping) into a single archive, merging
//! with whatever archive already exists at that location.

pub mod archive;
pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod traverse;
pub mod types;
