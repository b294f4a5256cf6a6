//! Embedder trait and vector utilities.
//!
//! Defines the [`Embedder`] trait that all embedding backends implement,
//! plus pure helper functions for normalization, similarity, and vector
//! serialization. Concrete backends (hashing, OpenAI, Ollama) live in the
//! `passage` app crate; the core only needs the capability.
//!
//! Embedding is a synchronous boundary from the core's point of view: a
//! backend may be network-bound internally, but callers receive a
//! completed vector, so the chunker and store contain no suspension
//! points.

use anyhow::Result;

/// An opaque embedding backend.
///
/// Implementations must produce vectors of a fixed dimensionality
/// ([`dims`](Embedder::dims)); the [`VectorStore`](crate::store::VectorStore)
/// rejects anything else.
pub trait Embedder: Send + Sync {
    /// Model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;
    /// Embedding vector dimensionality (e.g. `384`).
    fn dims(&self) -> usize;
    /// Embed a single text span.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    /// Embed a batch of texts, one vector per input, in input order.
    ///
    /// Backends with a batch API override this; the default embeds
    /// text-by-text.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Scale a vector to unit L2 norm, in place.
///
/// Zero (and near-zero) vectors are left untouched rather than divided by
/// a vanishing norm; their inner product against anything is 0.
pub fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
}

/// Inner product of two equal-length vectors.
///
/// Over unit-normalized inputs this is cosine similarity in `[-1.0, 1.0]`.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors or vectors of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

/// Encode a float vector as little-endian `f32` bytes.
///
/// Each `f32` is stored as 4 bytes in little-endian order, producing a
/// blob of `vec.len() × 4` bytes. Used by the vectors artifact of a store
/// snapshot.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a little-endian `f32` blob back into a float vector.
///
/// Reverses [`vec_to_blob`]. Trailing bytes that do not form a whole
/// `f32` are ignored; snapshot loading validates geometry separately.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
