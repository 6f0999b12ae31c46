//! Bundle container: packrat's native single-file archive.
//!
//! Layout: an 8-byte magic followed by the bincode encoding of
//! `Vec<ArchiveEntry>` in archive order.

use crate::archive::ArchiveEntry;
use crate::error::ArchiveError;
use std::io::{BufReader, Read, Write};

/// Magic bytes identifying a bundle; the last byte is the format version
pub const BUNDLE_MAGIC: [u8; 8] = *b"PKRAT\0\0\x01";

pub fn read_entries<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut reader = BufReader::new(reader);

    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            ArchiveError::Corrupt("file too short for bundle header".to_string())
        }
        _ => ArchiveError::Io(e),
    })?;
    if magic != BUNDLE_MAGIC {
        return Err(ArchiveError::Corrupt(
            "missing bundle magic (not a packrat bundle?)".to_string(),
        ));
    }

    bincode::deserialize_from(reader)
        .map_err(|e| ArchiveError::Corrupt(format!("Failed to decode bundle entries: {}", e)))
}

pub fn write_entries<W: Write>(mut writer: W, entries: &[ArchiveEntry]) -> Result<(), ArchiveError> {
    writer.write_all(&BUNDLE_MAGIC)?;
    bincode::serialize_into(&mut writer, entries)
        .map_err(|e| ArchiveError::Encode(format!("Failed to encode bundle entries: {}", e)))
}
