// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The partition directory: an ordered `(smallest_token, file_name)` list
//! used to binary-search for the partition containing a query token
//! (spec.md §3, §4.7 step 2).

use super::{read_header, read_string, write_footer, write_header, write_string, MAGIC_DIRECTORY};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDirectoryEntry {
    pub smallest_token: String,
    pub file_name: String,
}

pub fn write_directory(path: &Path, entries: &[PartitionDirectoryEntry]) -> io::Result<()> {
    let mut payload = Vec::new();
    write_header(&mut payload, MAGIC_DIRECTORY, entries.len() as u64)?;
    for entry in entries {
        write_string(&mut payload, &entry.smallest_token)?;
        write_string(&mut payload, &entry.file_name)?;
    }
    let mut footer = Vec::with_capacity(8);
    write_footer(&mut footer, MAGIC_DIRECTORY, &payload)?;
    payload.extend_from_slice(&footer);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&payload)?;
    writer.flush()
}

pub fn read_directory(path: &Path) -> io::Result<Vec<PartitionDirectoryEntry>> {
    let bytes = std::fs::read(path)?;
    super::verify_footer(&bytes, MAGIC_DIRECTORY)?;

    let mut cursor = io::Cursor::new(&bytes[..bytes.len() - 8]);
    let count = read_header(&mut cursor, MAGIC_DIRECTORY)?;

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let smallest_token = read_string(&mut cursor)?;
        let file_name = read_string(&mut cursor)?;
        entries.push(PartitionDirectoryEntry {
            smallest_token,
            file_name,
        });
    }
    Ok(entries)
}
