//! Tar container support.
//!
//! Content entries become regular files and symlink markers become tar
//! symlink entries whose link name is the resolved target. Entry metadata is
//! fixed (mode, zero mtime) so rewriting unchanged state yields identical bytes.

use crate::archive::{ArchiveEntry, EntryBody};
use crate::error::ArchiveError;
use std::io::{BufReader, Read, Write};
use tar::{Archive, Builder, EntryType, Header};
use tracing::warn;

fn corrupt(e: std::io::Error) -> ArchiveError {
    ArchiveError::Corrupt(format!("Invalid tar archive: {}", e))
}

pub fn read_entries<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = Archive::new(BufReader::new(reader));
    let mut entries = Vec::new();

    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let name = entry.path().map_err(corrupt)?.to_string_lossy().into_owned();

        match entry.header().entry_type() {
            EntryType::Regular | EntryType::Continuous => {
                // The header's size is untrusted; grow the buffer as data actually arrives
                let declared = entry.size();
                let mut content = Vec::new();
                entry.read_to_end(&mut content).map_err(corrupt)?;
                if content.len() as u64 != declared {
                    return Err(ArchiveError::Corrupt(format!(
                        "Tar entry {} is truncated: header declares {} bytes, found {}",
                        name,
                        declared,
                        content.len()
                    )));
                }
                entries.push(ArchiveEntry {
                    name,
                    body: EntryBody::Content(content),
                });
            }
            EntryType::Symlink => {
                let target = entry
                    .link_name()
                    .map_err(corrupt)?
                    .ok_or_else(|| {
                        ArchiveError::Corrupt(format!("Symlink entry {} has no target", name))
                    })?
                    .to_string_lossy()
                    .into_owned();
                entries.push(ArchiveEntry {
                    name,
                    body: EntryBody::Symlink { target },
                });
            }
            other => {
                warn!(name = %name, entry_type = ?other, "Skipping unsupported tar entry");
            }
        }
    }

    Ok(entries)
}

pub fn write_entries<W: Write>(writer: W, entries: &[ArchiveEntry]) -> Result<(), ArchiveError> {
    let mut builder = Builder::new(writer);

    for entry in entries {
        let mut header = Header::new_gnu();
        header.set_mtime(0);
        match &entry.body {
            EntryBody::Content(content) => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(content.len() as u64);
                builder.append_data(&mut header, &entry.name, content.as_slice())?;
            }
            EntryBody::Symlink { target } => {
                header.set_entry_type(EntryType::Symlink);
                header.set_mode(0o777);
                header.set_size(0);
                builder.append_link(&mut header, &entry.name, target)?;
            }
        }
    }

    builder.into_inner()?;
    Ok(())
}
