// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk binary framing for partitions, the df table, the document-vector
//! table, and the partition directory.
//!
//! Every artifact uses the same skeleton: a small fixed header (magic +
//! version + record count), a stream of length-prefixed, varint-tagged
//! records that can be read without loading the whole file into memory, and
//! an 8-byte footer (CRC32 over everything before it, plus a reversed magic)
//! so a truncated or corrupted file is caught at load time rather than
//! silently misread. This is the same shape the partition format in spec.md
//! §6 asks for: "length-prefixed records ... prefix-framed so partitions can
//! be read as streams ... explicit field tags and varint integers."

mod directory;
mod table;
mod varint;

pub mod partition;

pub use directory::{read_directory, write_directory, PartitionDirectoryEntry};
pub use table::{read_df_table, read_vector_table, write_df_table, write_vector_table};
pub use varint::{decode_varint, encode_varint};

use crc32fast::Hasher as Crc32Hasher;
use std::io::{self, Read, Write};

/// Format version. Bumped whenever the on-disk record shape changes.
pub const VERSION: u8 = 1;

pub const MAGIC_PARTITION: [u8; 4] = *b"STPT";
pub const MAGIC_DF_TABLE: [u8; 4] = *b"STDF";
pub const MAGIC_VECTOR_TABLE: [u8; 4] = *b"STVC";
pub const MAGIC_DIRECTORY: [u8; 4] = *b"STDR";
pub const MAGIC_PATH_MAPPER: [u8; 4] = *b"STPM";

/// Maximum varint length for a u64 (LEB128, 7 bits per byte).
pub const MAX_VARINT_BYTES: usize = 10;

/// Defensive cap: refuse to allocate a length-prefixed blob bigger than
/// this from untrusted/corrupt input.
pub const MAX_BLOB_LEN: usize = 256 * 1024 * 1024;

fn reversed(magic: [u8; 4]) -> [u8; 4] {
    [magic[3], magic[2], magic[1], magic[0]]
}

/// Write the fixed header shared by every artifact: magic, version, then a
/// varint record count.
pub fn write_header<W: Write>(w: &mut W, magic: [u8; 4], count: u64) -> io::Result<()> {
    w.write_all(&magic)?;
    w.write_all(&[VERSION])?;
    let mut buf = Vec::with_capacity(MAX_VARINT_BYTES);
    encode_varint(count, &mut buf);
    w.write_all(&buf)
}

/// Read and validate the fixed header, returning the record count.
pub fn read_header<R: Read>(r: &mut R, expected_magic: [u8; 4]) -> io::Result<u64> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != expected_magic {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("bad magic: expected {expected_magic:?}, got {magic:?}"),
        ));
    }
    let mut version = [0u8; 1];
    r.read_exact(&mut version)?;
    if version[0] != VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported format version {}", version[0]),
        ));
    }
    read_varint_from(r)
}

/// Write the CRC32 footer: checksum over `payload`, then the reversed magic.
pub fn write_footer<W: Write>(w: &mut W, magic: [u8; 4], payload: &[u8]) -> io::Result<()> {
    let mut hasher = Crc32Hasher::new();
    hasher.update(payload);
    let crc = hasher.finalize();
    w.write_all(&crc.to_le_bytes())?;
    w.write_all(&reversed(magic))
}

/// Verify the CRC32 footer against the bytes preceding it in `full_file`.
/// `full_file` must contain the whole artifact; footers are 8 bytes.
pub fn verify_footer(full_file: &[u8], magic: [u8; 4]) -> io::Result<()> {
    if full_file.len() < 8 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "file too short to contain a footer",
        ));
    }
    let (payload, footer) = full_file.split_at(full_file.len() - 8);
    let stored_crc = u32::from_le_bytes(footer[0..4].try_into().unwrap());
    let stored_magic: [u8; 4] = footer[4..8].try_into().unwrap();
    if stored_magic != reversed(magic) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "bad footer magic",
        ));
    }
    let mut hasher = Crc32Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != stored_crc {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "CRC32 mismatch: file is corrupt or truncated",
        ));
    }
    Ok(())
}

/// Read a varint directly from a `Read` stream, one byte at a time. Slower
/// than decoding from an in-memory slice but keeps the directory/table
/// readers streaming-friendly.
pub fn read_varint_from<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut result: u64 = 0;
    let mut shift = 0;
    for _ in 0..MAX_VARINT_BYTES {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        result |= ((byte[0] & 0x7F) as u64) << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "varint exceeds maximum length (possible corruption)",
    ))
}

/// Write a length-prefixed UTF-8 string.
pub fn write_string<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    let mut buf = Vec::with_capacity(MAX_VARINT_BYTES);
    encode_varint(s.len() as u64, &mut buf);
    w.write_all(&buf)?;
    w.write_all(s.as_bytes())
}

/// Read a length-prefixed UTF-8 string.
pub fn read_string<R: Read>(r: &mut R) -> io::Result<String> {
    let len = read_varint_from(r)? as usize;
    if len > MAX_BLOB_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("string length {len} exceeds maximum {MAX_BLOB_LEN}"),
        ));
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_footer_roundtrip() {
        let mut buf = Vec::new();
        write_header(&mut buf, MAGIC_PARTITION, 3).unwrap();
        write_string(&mut buf, "hello").unwrap();
        let mut footer = Vec::new();
        write_footer(&mut footer, MAGIC_PARTITION, &buf).unwrap();
        buf.extend_from_slice(&footer);

        let mut cursor = Cursor::new(&buf[..]);
        let count = read_header(&mut cursor, MAGIC_PARTITION).unwrap();
        assert_eq!(count, 3);
        let s = read_string(&mut cursor).unwrap();
        assert_eq!(s, "hello");

        verify_footer(&buf, MAGIC_PARTITION).unwrap();
    }

    #[test]
    fn footer_detects_corruption() {
        let mut buf = Vec::new();
        write_header(&mut buf, MAGIC_DF_TABLE, 1).unwrap();
        let mut footer = Vec::new();
        write_footer(&mut footer, MAGIC_DF_TABLE, &buf).unwrap();
        buf.extend_from_slice(&footer);
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;
        assert!(verify_footer(&buf, MAGIC_DF_TABLE).is_err());
    }
}
