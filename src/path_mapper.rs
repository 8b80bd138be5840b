// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bijection between document URL and a dense 0-based `doc_id` (spec.md
//! §4.2). Ids are assigned monotonically in first-seen order, so a build
//! over a fixed file enumeration is reproducible. Immutable once a build
//! reaches `Ready`.

use crate::binary::MAGIC_PATH_MAPPER;
use crate::binary::{
    read_header, read_string, verify_footer, write_footer, write_header, write_string,
};
use crate::types::DocId;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Default)]
pub struct PathMapper {
    urls: Vec<String>,
    ids: HashMap<String, DocId>,
}

impl PathMapper {
    pub fn new() -> Self {
        PathMapper::default()
    }

    /// Assign a fresh `doc_id` if `url` hasn't been seen before, else
    /// return the existing one.
    pub fn intern(&mut self, url: &str) -> DocId {
        if let Some(&id) = self.ids.get(url) {
            return id;
        }
        let id = DocId(self.urls.len() as u32);
        self.urls.push(url.to_string());
        self.ids.insert(url.to_string(), id);
        id
    }

    pub fn url_of(&self, doc_id: DocId) -> Option<&str> {
        self.urls.get(doc_id.as_usize()).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut payload = Vec::new();
        write_header(&mut payload, MAGIC_PATH_MAPPER, self.urls.len() as u64)?;
        for url in &self.urls {
            write_string(&mut payload, url)?;
        }
        let mut footer = Vec::with_capacity(8);
        write_footer(&mut footer, MAGIC_PATH_MAPPER, &payload)?;
        payload.extend_from_slice(&footer);

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&payload)?;
        writer.flush()
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        verify_footer(&bytes, MAGIC_PATH_MAPPER)?;

        let mut cursor = io::Cursor::new(&bytes[..bytes.len() - 8]);
        let count = read_header(&mut cursor, MAGIC_PATH_MAPPER)?;

        let mut urls = Vec::with_capacity(count as usize);
        let mut ids = HashMap::with_capacity(count as usize);
        for i in 0..count {
            let url = read_string(&mut cursor)?;
            ids.insert(url.clone(), DocId(i as u32));
            urls.push(url);
        }
        Ok(PathMapper { urls, ids })
    }
}
