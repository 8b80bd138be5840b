// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! K-way merge of intermediate partition files (spec.md §4.5). Each
//! spilled file is already sorted by token; `KWayMerger` streams them
//! through a binary heap keyed by `(token, source_index)`, coalescing
//! postings for the same token across files via `TokenEntry::merge`.
//! Peak memory is O(number of intermediate files), not O(vocabulary).

use crate::binary::partition::PartitionReader;
use crate::types::{Token, TokenEntry};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io;
use std::path::Path;

pub struct KWayMerger {
    readers: Vec<PartitionReader>,
    /// Entry data for each reader's current heap-resident token, if any.
    peeked: Vec<Option<TokenEntry>>,
    heap: BinaryHeap<Reverse<(Token, usize)>>,
}

impl KWayMerger {
    pub fn open(paths: &[impl AsRef<Path>]) -> io::Result<Self> {
        let mut readers = Vec::with_capacity(paths.len());
        for path in paths {
            readers.push(PartitionReader::open(path.as_ref())?);
        }
        let mut merger = KWayMerger {
            readers,
            peeked: Vec::new(),
            heap: BinaryHeap::new(),
        };
        merger.peeked = vec![None; merger.readers.len()];
        for idx in 0..merger.readers.len() {
            merger.refill(idx)?;
        }
        Ok(merger)
    }

    fn refill(&mut self, idx: usize) -> io::Result<()> {
        if let Some((token, entry)) = self.readers[idx].next_record()? {
            self.peeked[idx] = Some(entry);
            self.heap.push(Reverse((token, idx)));
        }
        Ok(())
    }

    /// Pull the next coalesced `(token, TokenEntry)` pair in ascending
    /// token order, merging postings from every source file that held
    /// that token. Returns `None` once every reader is exhausted.
    pub fn next_entry(&mut self) -> io::Result<Option<(Token, TokenEntry)>> {
        let Some(Reverse((token, idx))) = self.heap.pop() else {
            return Ok(None);
        };
        let mut acc = self.peeked[idx]
            .take()
            .expect("heap entry without peeked data");
        self.refill(idx)?;

        while let Some(Reverse((next_token, _))) = self.heap.peek() {
            if *next_token != token {
                break;
            }
            let Reverse((_, next_idx)) = self.heap.pop().unwrap();
            let other = self.peeked[next_idx]
                .take()
                .expect("heap entry without peeked data");
            acc.merge(other);
            self.refill(next_idx)?;
        }

        Ok(Some((token, acc)))
    }
}
