//! Core data models used throughout Passage.
//!
//! These types represent the documents, passages, and search results that
//! flow through the chunking and retrieval pipeline.

use serde::{Deserialize, Serialize};

/// A normalized document produced by the ingestion boundary.
///
/// Passage does not extract or clean text itself: whatever loads the
/// document (filesystem scan, PDF extractor, ...) hands over the already
/// normalized `full_text`. Documents are immutable once constructed.
#[derive(Debug, Clone)]
pub struct Document {
    /// Originating filename; used as the chunk `source` identity.
    pub filename: String,
    /// Full normalized body text.
    pub full_text: String,
    /// Per-page text, when the loader preserves page structure.
    pub pages: Option<Vec<Page>>,
}

/// A single page of a [`Document`], for loaders that keep page boundaries.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub text: String,
}

impl Document {
    /// Convenience constructor for plain-text documents without pages.
    pub fn new(filename: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            full_text: full_text.into(),
            pages: None,
        }
    }
}

/// A bounded, overlapping passage of document text.
///
/// Chunks are created once during ingestion and never mutated. They are
/// serialized as the metadata artifact of a [`VectorStore`](crate::store::VectorStore)
/// snapshot, positionally aligned with the vectors artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Per-document sequence number, starting at 0.
    pub chunk_id: usize,
    /// Monotonic counter across an entire ingestion batch.
    ///
    /// [`chunk_text`](crate::chunk::TextChunker::chunk_text) seeds this with
    /// the per-document id;
    /// [`chunk_documents`](crate::chunk::TextChunker::chunk_documents)
    /// renumbers across the whole batch.
    pub global_id: usize,
    pub text: String,
    /// Filename of the originating document.
    pub source: String,
    /// Token count of `text` under the chunker's counter.
    pub token_count: usize,
}

/// A ranked search hit: a chunk plus its similarity to the query.
///
/// The score is the inner product of unit-normalized vectors (cosine
/// similarity), in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// Read-only diagnostic snapshot of a retriever and its store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrieverStats {
    /// Embedding model identifier.
    pub model: String,
    /// Embedding dimensionality.
    pub dims: usize,
    /// Number of vectors currently indexed.
    pub vectors: usize,
    /// Default number of results per query.
    pub top_k: usize,
}
