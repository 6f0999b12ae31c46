//! Archive Merge Store
//!
//! An archive is an ordered set of named entries. The whole archive is
//! loaded into an [`ArchiveState`] at the start of a backup, reconciled in
//! memory as nodes are discovered, and persisted once at the end. Persisting
//! replaces the file atomically, so the on-disk archive is never observed
//! half-written.

pub mod bundle;
pub mod location;
pub mod naming;
pub mod tarball;

use crate::error::ArchiveError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, trace};

pub use location::{expand_location, expand_location_today};
pub use naming::{entry_name, symlink_entry_name, SYMLINK_SUFFIX};

/// Payload of one archive entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryBody {
    /// Full bytes of a regular file
    Content(Vec<u8>),
    /// Marker for a symlink; `target` is the absolute resolved path
    Symlink { target: String },
}

/// One named entry of an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub body: EntryBody,
}

/// Outcome of a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Inserted,
    Updated,
}

/// In-memory contents of one archive location
#[derive(Debug, Clone, Default)]
pub struct ArchiveState {
    entries: Vec<ArchiveEntry>,
    index: HashMap<String, usize>,
}

impl ArchiveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from decoded entries. Later duplicates overwrite earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = ArchiveEntry>) -> Self {
        let mut state = Self::new();
        for entry in entries {
            state.upsert(entry);
        }
        state
    }

    /// Insert or overwrite the content entry for `path`
    pub fn reconcile(&mut self, path: &Path, content: Vec<u8>) -> Reconciled {
        self.upsert(ArchiveEntry {
            name: entry_name(path),
            body: EntryBody::Content(content),
        })
    }

    /// Insert or overwrite the marker entry for the symlink at `path`
    pub fn reconcile_symlink(&mut self, path: &Path, target: &Path) -> Reconciled {
        self.upsert(ArchiveEntry {
            name: symlink_entry_name(path),
            body: EntryBody::Symlink {
                target: target.to_string_lossy().into_owned(),
            },
        })
    }

    /// Insert-or-update by entry name; updates keep the entry's position
    pub fn upsert(&mut self, entry: ArchiveEntry) -> Reconciled {
        match self.index.get(&entry.name) {
            Some(&idx) => {
                trace!(name = %entry.name, "Updating archive entry");
                self.entries[idx] = entry;
                Reconciled::Updated
            }
            None => {
                trace!(name = %entry.name, "Inserting archive entry");
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
                Reconciled::Inserted
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Supported archive containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    /// Native container: magic header followed by bincode-encoded entries
    Bundle,
    /// POSIX tar file
    Tar,
}

impl ArchiveFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveFormat::Bundle => "bundle",
            ArchiveFormat::Tar => "tar",
        }
    }

    /// Load the archive at `location`, or an empty state if there is none
    pub fn open(&self, location: &Path) -> Result<ArchiveState, ArchiveError> {
        let file = match File::open(location) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ArchiveState::new());
            }
            Err(e) => return Err(ArchiveError::Io(e)),
        };

        let entries = match self {
            ArchiveFormat::Bundle => bundle::read_entries(file)?,
            ArchiveFormat::Tar => tarball::read_entries(file)?,
        };
        Ok(ArchiveState::from_entries(entries))
    }

    /// Serialize `state` and atomically replace whatever is at `location`
    pub fn persist(&self, state: &ArchiveState, location: &Path) -> Result<(), ArchiveError> {
        let parent = match location.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        // Same directory as the target so the final rename stays on one filesystem
        let temp = tempfile::NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            match self {
                ArchiveFormat::Bundle => bundle::write_entries(&mut writer, state.entries())?,
                ArchiveFormat::Tar => tarball::write_entries(&mut writer, state.entries())?,
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(location).map_err(|e| ArchiveError::Io(e.error))?;

        info!(
            location = %location.display(),
            format = self.as_str(),
            entries = state.len(),
            "Archive persisted"
        );
        Ok(())
    }
}
