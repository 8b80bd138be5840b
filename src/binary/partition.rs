// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Partition file framing: `(token, TokenEntry)` records, sorted by token.
//!
//! A record is a length-prefixed token followed by a framed `TokenEntry`:
//! `df` as a varint, then `df` postings. Postings delta-encode `doc_id`
//! against the previous posting in the same entry (lists are sorted
//! ascending by construction, so deltas are small and compress well) and
//! varint-encode `frequency`, then a small tag-frequency table.
//!
//! Intermediate (pre-merge) partition files and final partitions share this
//! exact framing; the only difference is how many records they hold and
//! whether a `TokenEntry`'s postings have already been fully merged.

use super::{
    decode_varint, encode_varint, read_header, read_string, read_varint_from, verify_footer,
    write_footer, write_header, write_string, MAGIC_PARTITION,
};
use crate::types::{DocId, Posting, TagFrequencies, Token, TokenEntry};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Encode one `TokenEntry` (its `df` plus postings) into `buf`.
pub fn encode_token_entry(entry: &TokenEntry, buf: &mut Vec<u8>) {
    encode_varint(entry.df as u64, buf);
    let mut prev_doc_id = 0u32;
    for posting in &entry.postings {
        let delta = posting.doc_id.get() - prev_doc_id;
        encode_varint(delta as u64, buf);
        prev_doc_id = posting.doc_id.get();

        encode_varint(posting.frequency as u64, buf);
        encode_varint(posting.tag_frequencies.len() as u64, buf);
        for (tag, count) in &posting.tag_frequencies {
            buf.push(tag.code());
            encode_varint(*count as u64, buf);
        }
    }
}

/// Decode a `TokenEntry` from the start of `bytes`, returning `(entry, bytes_consumed)`.
pub fn decode_token_entry(bytes: &[u8]) -> io::Result<(TokenEntry, usize)> {
    let (df, mut pos) = decode_varint(bytes)?;
    let df = df as usize;

    let mut postings = Vec::with_capacity(df);
    let mut prev_doc_id = 0u32;
    for _ in 0..df {
        let (delta, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        let doc_id = prev_doc_id + delta as u32;
        prev_doc_id = doc_id;

        let (frequency, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;

        let (tag_count, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;

        let mut tag_frequencies = TagFrequencies::new();
        for _ in 0..tag_count {
            if pos >= bytes.len() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated tag frequency entry",
                ));
            }
            let code = bytes[pos];
            pos += 1;
            let tag = crate::types::Tag::from_code(code).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown tag code {code}"),
                )
            })?;
            let (count, consumed) = decode_varint(&bytes[pos..])?;
            pos += consumed;
            tag_frequencies.insert(tag, count as u32);
        }

        postings.push(Posting {
            doc_id: DocId(doc_id),
            frequency: frequency as u32,
            tag_frequencies,
        });
    }

    Ok((
        TokenEntry {
            df: df as u32,
            postings,
        },
        pos,
    ))
}

/// Write one `(token, entry)` record into `buf`, returning the number of
/// bytes appended (used by the index splitter to track partition size).
pub fn encode_record(token: &str, entry: &TokenEntry, buf: &mut Vec<u8>) -> usize {
    let start = buf.len();
    write_string(buf, token).expect("writing to Vec<u8> cannot fail");
    encode_token_entry(entry, buf);
    buf.len() - start
}

/// A streaming reader over a partition file's `(token, TokenEntry)` records.
/// Used by the k-way merger so peak memory stays O(number of partitions),
/// not O(vocabulary).
pub struct PartitionReader {
    reader: BufReader<File>,
    remaining: u64,
}

impl PartitionReader {
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let remaining = read_header(&mut reader, MAGIC_PARTITION)?;
        Ok(PartitionReader { reader, remaining })
    }

    /// Read the next `(token, TokenEntry)` record, or `None` at end of stream.
    pub fn next_record(&mut self) -> io::Result<Option<(Token, TokenEntry)>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let token = read_string(&mut self.reader)?;

        let df = read_varint_from(&mut self.reader)? as usize;
        let mut postings = Vec::with_capacity(df);
        let mut prev_doc_id = 0u32;
        for _ in 0..df {
            let delta = read_varint_from(&mut self.reader)? as u32;
            let doc_id = prev_doc_id + delta;
            prev_doc_id = doc_id;
            let frequency = read_varint_from(&mut self.reader)? as u32;
            let tag_count = read_varint_from(&mut self.reader)?;
            let mut tag_frequencies = TagFrequencies::new();
            for _ in 0..tag_count {
                let mut code = [0u8; 1];
                self.reader.read_exact(&mut code)?;
                let tag = crate::types::Tag::from_code(code[0]).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("unknown tag code {}", code[0]),
                    )
                })?;
                let count = read_varint_from(&mut self.reader)? as u32;
                tag_frequencies.insert(tag, count);
            }
            postings.push(Posting {
                doc_id: DocId(doc_id),
                frequency,
                tag_frequencies,
            });
        }

        self.remaining -= 1;
        Ok(Some((
            token,
            TokenEntry {
                df: df as u32,
                postings,
            },
        )))
    }
}

/// Write a whole partition file: header, then every `(token, entry)` record
/// in `records` (already sorted ascending by token), then the CRC footer.
/// Partitions are bounded in size by construction (spec.md §4.4/§4.6), so
/// buffering the payload in memory before a single write is fine.
pub fn write_partition_file<'a, I>(path: &Path, records: I) -> io::Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a TokenEntry)>,
    I::IntoIter: ExactSizeIterator,
{
    let records = records.into_iter();
    let count = records.len() as u64;

    let mut payload = Vec::new();
    write_header(&mut payload, MAGIC_PARTITION, count)?;
    for (token, entry) in records {
        write_string(&mut payload, token)?;
        encode_token_entry(entry, &mut payload);
    }
    let mut footer = Vec::with_capacity(8);
    write_footer(&mut footer, MAGIC_PARTITION, &payload)?;
    payload.extend_from_slice(&footer);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&payload)?;
    writer.flush()
}

/// Load an entire partition file into memory as a sorted `Vec`, verifying
/// its CRC footer first. Partitions are size-bounded, so this is the
/// searcher's normal path: load once, then binary-search the in-memory
/// vector per spec.md §4.7 step 2.
pub fn read_partition_file(path: &Path) -> io::Result<Vec<(Token, TokenEntry)>> {
    let bytes = std::fs::read(path)?;
    verify_footer(&bytes, MAGIC_PARTITION)?;

    let mut cursor = io::Cursor::new(&bytes[..bytes.len() - 8]);
    let count = read_header(&mut cursor, MAGIC_PARTITION)?;

    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let token = read_string(&mut cursor)?;
        let pos = cursor.position() as usize;
        let (entry, consumed) = decode_token_entry(&bytes[pos..bytes.len() - 8])?;
        cursor.set_position((pos + consumed) as u64);
        records.push((token, entry));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tag;
    use tempfile::tempdir;

    fn sample_entry() -> TokenEntry {
        let mut tags_a = TagFrequencies::new();
        tags_a.insert(Tag::Title, 1);
        tags_a.insert(Tag::Body, 3);
        let mut tags_b = TagFrequencies::new();
        tags_b.insert(Tag::Body, 1);
        TokenEntry {
            df: 2,
            postings: vec![
                Posting {
                    doc_id: DocId(2),
                    frequency: 4,
                    tag_frequencies: tags_a,
                },
                Posting {
                    doc_id: DocId(9),
                    frequency: 1,
                    tag_frequencies: tags_b,
                },
            ],
        }
    }

    #[test]
    fn token_entry_roundtrips() {
        let entry = sample_entry();
        let mut buf = Vec::new();
        encode_token_entry(&entry, &mut buf);
        let (decoded, consumed) = decode_token_entry(&buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded.df, entry.df);
        assert_eq!(decoded.postings.len(), entry.postings.len());
        for (a, b) in decoded.postings.iter().zip(entry.postings.iter()) {
            assert_eq!(a.doc_id, b.doc_id);
            assert_eq!(a.frequency, b.frequency);
            assert_eq!(a.tag_frequencies, b.tag_frequencies);
        }
    }

    #[test]
    fn partition_file_roundtrips_via_reader_and_full_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partition_fox.bin");
        let entries = [
            ("fox".to_string(), sample_entry()),
            ("quick".to_string(), sample_entry()),
        ];
        let refs: Vec<(&str, &TokenEntry)> = entries.iter().map(|(t, e)| (t.as_str(), e)).collect();
        write_partition_file(&path, refs).unwrap();

        let loaded = read_partition_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].0, "fox");
        assert_eq!(loaded[1].0, "quick");

        let mut reader = PartitionReader::open(&path).unwrap();
        let mut streamed = Vec::new();
        while let Some(record) = reader.next_record().unwrap() {
            streamed.push(record);
        }
        assert_eq!(streamed.len(), 2);
        assert_eq!(streamed[0].0, "fox");
    }
}
