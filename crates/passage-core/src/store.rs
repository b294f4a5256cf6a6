//! Exact-similarity vector store with positional metadata and snapshots.
//!
//! [`VectorStore`] holds one growable sequence of paired (unit vector,
//! chunk) records, so the vector/metadata alignment invariant is
//! structural: there is no second sequence to drift out of step. Search
//! is an exact brute-force inner-product scan — correctness over
//! sub-linear scaling at this corpus size. The scan is a private detail;
//! a sub-linear index could replace it behind the same `add` / `search` /
//! `len` surface.
//!
//! A snapshot is a directory with two aligned artifacts:
//!
//! - `vectors.bin` — a dims/count header followed by the ordered vectors
//!   as little-endian `f32` bytes (see [`vec_to_blob`]).
//! - `metadata.json` — the ordered chunk records as a JSON array.
//!
//! [`load`](VectorStore::load) verifies the artifact geometry and equal
//! element counts, and fails loudly on disagreement rather than
//! truncating to the shorter side.

use std::cmp::Ordering;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::embedding::{blob_to_vec, dot, l2_normalize, vec_to_blob};
use crate::models::{Chunk, SearchResult};

const VECTORS_FILE: &str = "vectors.bin";
const METADATA_FILE: &str = "metadata.json";
/// vectors.bin header: u32 dims + u64 count, both little-endian.
const HEADER_LEN: usize = 12;

#[derive(Debug)]
struct Record {
    /// Unit-normalized embedding, so inner product = cosine similarity.
    vector: Vec<f32>,
    chunk: Chunk,
}

/// Append-only store of embedded passages with exact top-k search.
#[derive(Debug)]
pub struct VectorStore {
    dims: usize,
    records: Vec<Record>,
}

impl VectorStore {
    /// Create an empty store of fixed dimension `dims`.
    ///
    /// The dimension is immutable for the store's lifetime; every added
    /// vector and every query must match it exactly.
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            records: Vec::new(),
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a batch of (vector, chunk) pairs.
    ///
    /// All-or-nothing: inputs are validated in full — equal batch
    /// lengths, every vector of dimension `dims` — before any record is
    /// appended, so a rejected batch leaves the store exactly as it was.
    /// Vectors are L2-normalized on insert.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>, chunks: Vec<Chunk>) -> Result<()> {
        if vectors.len() != chunks.len() {
            bail!(
                "batch mismatch: {} vectors but {} chunks",
                vectors.len(),
                chunks.len()
            );
        }
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != self.dims {
                bail!(
                    "vector {} has dimension {}, store expects {}",
                    i,
                    vector.len(),
                    self.dims
                );
            }
        }

        self.records.reserve(vectors.len());
        for (mut vector, chunk) in vectors.into_iter().zip(chunks) {
            l2_normalize(&mut vector);
            self.records.push(Record { vector, chunk });
        }
        Ok(())
    }

    /// Exact top-`k` search by cosine similarity.
    ///
    /// The query is normalized, scored against every stored vector, and
    /// the results are ordered by descending score; exactly equal scores
    /// resolve by ascending insertion position, so rankings are
    /// reproducible. `k` is clamped to the store size; an empty store
    /// returns an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dims {
            bail!(
                "query has dimension {}, store expects {}",
                query.len(),
                self.dims
            );
        }
        if self.records.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = query.to_vec();
        l2_normalize(&mut query);

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (i, dot(&query, &r.vector)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k.min(self.records.len()));

        Ok(scored
            .into_iter()
            .map(|(i, score)| SearchResult {
                chunk: self.records[i].chunk.clone(),
                score,
            })
            .collect())
    }

    /// Reset to an empty store of the same dimension.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Write the snapshot artifacts under `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create snapshot directory {}", dir.display()))?;

        let mut blob = Vec::with_capacity(HEADER_LEN + self.records.len() * self.dims * 4);
        blob.extend_from_slice(&(self.dims as u32).to_le_bytes());
        blob.extend_from_slice(&(self.records.len() as u64).to_le_bytes());
        for record in &self.records {
            blob.extend_from_slice(&vec_to_blob(&record.vector));
        }
        let vectors_path = dir.join(VECTORS_FILE);
        std::fs::write(&vectors_path, blob)
            .with_context(|| format!("failed to write {}", vectors_path.display()))?;

        let chunks: Vec<&Chunk> = self.records.iter().map(|r| &r.chunk).collect();
        let metadata_path = dir.join(METADATA_FILE);
        let json = serde_json::to_vec(&chunks)?;
        std::fs::write(&metadata_path, json)
            .with_context(|| format!("failed to write {}", metadata_path.display()))?;

        Ok(())
    }

    /// Load a snapshot written by [`save`](Self::save).
    ///
    /// Restores the exact positional alignment of the two artifacts.
    /// Fails if either artifact is missing or malformed, or if the two
    /// disagree on element count.
    pub fn load(dir: &Path) -> Result<Self> {
        let vectors_path = dir.join(VECTORS_FILE);
        let blob = std::fs::read(&vectors_path)
            .with_context(|| format!("failed to read {}", vectors_path.display()))?;
        if blob.len() < HEADER_LEN {
            bail!("{}: truncated header", vectors_path.display());
        }

        let dims = u32::from_le_bytes([blob[0], blob[1], blob[2], blob[3]]) as usize;
        let count = u64::from_le_bytes([
            blob[4], blob[5], blob[6], blob[7], blob[8], blob[9], blob[10], blob[11],
        ]) as usize;
        if dims == 0 {
            bail!("{}: zero dimension", vectors_path.display());
        }
        let expected = count
            .checked_mul(dims)
            .and_then(|n| n.checked_mul(4))
            .and_then(|n| n.checked_add(HEADER_LEN))
            .ok_or_else(|| anyhow::anyhow!("{}: implausible header", vectors_path.display()))?;
        if blob.len() != expected {
            bail!(
                "{}: expected {} bytes for {} vectors of dimension {}, found {}",
                vectors_path.display(),
                expected,
                count,
                dims,
                blob.len()
            );
        }

        let metadata_path = dir.join(METADATA_FILE);
        let json = std::fs::read(&metadata_path)
            .with_context(|| format!("failed to read {}", metadata_path.display()))?;
        let chunks: Vec<Chunk> = serde_json::from_slice(&json)
            .with_context(|| format!("failed to parse {}", metadata_path.display()))?;

        if chunks.len() != count {
            bail!(
                "snapshot artifacts disagree: {} vectors but {} metadata records",
                count,
                chunks.len()
            );
        }

        let records = blob[HEADER_LEN..]
            .chunks_exact(dims * 4)
            .map(blob_to_vec)
            .zip(chunks)
            .map(|(vector, chunk)| Record { vector, chunk })
            .collect();

        Ok(Self { dims, records })
    }

    /// Delete the snapshot artifacts under `dir`, if present.
    ///
    /// Returns whether anything was removed. Other files in the directory
    /// are left alone.
    pub fn remove_snapshot(dir: &Path) -> Result<bool> {
        let mut removed = false;
        for name in [VECTORS_FILE, METADATA_FILE] {
            let path = dir.join(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
                removed = true;
            }
        }
        Ok(removed)
    }
}
