// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `df.bin` (token -> document frequency) and `vectors.bin` (doc_id ->
//! sparse normalized TF-IDF vector), built in the index splitter's second
//! pass (spec.md §4.6).

use super::{
    decode_varint, encode_varint, read_header, read_string, write_footer, write_header,
    write_string, MAGIC_DF_TABLE, MAGIC_VECTOR_TABLE,
};
use crate::types::{DocVector, Token};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub fn write_df_table(path: &Path, df: &BTreeMap<Token, u32>) -> io::Result<()> {
    let mut payload = Vec::new();
    write_header(&mut payload, MAGIC_DF_TABLE, df.len() as u64)?;
    for (token, count) in df {
        write_string(&mut payload, token)?;
        encode_varint(*count as u64, &mut payload);
    }
    let mut footer = Vec::with_capacity(8);
    write_footer(&mut footer, MAGIC_DF_TABLE, &payload)?;
    payload.extend_from_slice(&footer);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&payload)?;
    writer.flush()
}

pub fn read_df_table(path: &Path) -> io::Result<BTreeMap<Token, u32>> {
    let bytes = std::fs::read(path)?;
    super::verify_footer(&bytes, MAGIC_DF_TABLE)?;

    let mut cursor = io::Cursor::new(&bytes[..bytes.len() - 8]);
    let count = read_header(&mut cursor, MAGIC_DF_TABLE)?;

    let mut table = BTreeMap::new();
    for _ in 0..count {
        let token = read_string(&mut cursor)?;
        let pos = cursor.position() as usize;
        let (df, consumed) = decode_varint(&bytes[pos..bytes.len() - 8])?;
        cursor.set_position((pos + consumed) as u64);
        table.insert(token, df as u32);
    }
    Ok(table)
}

/// Document vectors are serialized doc_id-ascending (doc_id is implicit:
/// the Nth record is document N), each a varint term count followed by
/// `(token, weight)` pairs. Weights are stored as raw little-endian `f32`
/// bits; they are already L2-normalized so there is nothing to gain from
/// varint-encoding a float.
pub fn write_vector_table(path: &Path, vectors: &[DocVector]) -> io::Result<()> {
    let mut payload = Vec::new();
    write_header(&mut payload, MAGIC_VECTOR_TABLE, vectors.len() as u64)?;
    for vector in vectors {
        encode_varint(vector.length as u64, &mut payload);
        encode_varint(vector.weights.len() as u64, &mut payload);
        for (token, weight) in &vector.weights {
            write_string(&mut payload, token)?;
            payload.extend_from_slice(&weight.to_le_bytes());
        }
    }
    let mut footer = Vec::with_capacity(8);
    write_footer(&mut footer, MAGIC_VECTOR_TABLE, &payload)?;
    payload.extend_from_slice(&footer);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&payload)?;
    writer.flush()
}

pub fn read_vector_table(path: &Path) -> io::Result<Vec<DocVector>> {
    let bytes = std::fs::read(path)?;
    super::verify_footer(&bytes, MAGIC_VECTOR_TABLE)?;

    let mut cursor = io::Cursor::new(&bytes[..bytes.len() - 8]);
    let count = read_header(&mut cursor, MAGIC_VECTOR_TABLE)?;

    let mut vectors = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let length = super::read_varint_from(&mut cursor)? as u32;
        let term_count = super::read_varint_from(&mut cursor)?;
        let mut weights = BTreeMap::new();
        for _ in 0..term_count {
            let token = read_string(&mut cursor)?;
            let pos = cursor.position() as usize;
            if pos + 4 > bytes.len() - 8 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated vector weight",
                ));
            }
            let weight = f32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
            cursor.set_position((pos + 4) as u64);
            weights.insert(token, weight);
        }
        vectors.push(DocVector { length, weights });
    }
    Ok(vectors)
}
