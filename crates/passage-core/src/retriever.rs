//! Query-to-context retrieval pipeline.
//!
//! [`Retriever`] composes an [`Embedder`] and a [`VectorStore`] into the
//! query path: embed the query, run an exact similarity search, and
//! optionally assemble the ranked hits into a context block for an
//! answer-generation step outside this crate.
//!
//! The retriever is stateless request/response — conversational history
//! and per-user session state live with the caller. The store sits behind
//! an `RwLock`: searches share the read side, while ingestion takes the
//! write side, keeping mutation single-writer without blocking concurrent
//! reads against each other.

use std::sync::{Arc, RwLock};

use anyhow::Result;

use crate::embedding::Embedder;
use crate::models::{RetrieverStats, SearchResult};
use crate::store::VectorStore;

/// Default number of passages returned per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Separator between formatted context blocks.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Stateless query pipeline over an embedder and a vector store.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<RwLock<VectorStore>>,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<RwLock<VectorStore>>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k,
        }
    }

    /// Return the ranked passages for `query`.
    ///
    /// `top_k` overrides the configured default when given. The ranking
    /// comes back from the store unmodified.
    pub fn retrieve(&self, query: &str, top_k: Option<usize>) -> Result<Vec<SearchResult>> {
        let k = top_k.unwrap_or(self.top_k);
        let query_vec = self.embedder.embed(query)?;
        let store = self.store.read().unwrap();
        store.search(&query_vec, k)
    }

    /// Retrieve and format the hits into a labeled context block.
    ///
    /// Each hit renders as `[{source}] (Score: {score:.2})\n{text}`,
    /// joined by a visible separator in descending-score order. The raw
    /// results are returned alongside for citation metadata.
    pub fn retrieve_with_context(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<(String, Vec<SearchResult>)> {
        let results = self.retrieve(query, top_k)?;
        let context = results
            .iter()
            .map(|r| {
                format!(
                    "[{}] (Score: {:.2})\n{}",
                    r.chunk.source, r.score, r.chunk.text
                )
            })
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        Ok((context, results))
    }

    /// Read-only diagnostic snapshot; no side effects.
    pub fn stats(&self) -> RetrieverStats {
        let store = self.store.read().unwrap();
        RetrieverStats {
            model: self.embedder.model_name().to_string(),
            dims: self.embedder.dims(),
            vectors: store.len(),
            top_k: self.top_k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;

    const VOCAB: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

    /// Bag-of-words embedder over a fixed four-word vocabulary.
    struct MockEmbedder;

    impl Embedder for MockEmbedder {
        fn model_name(&self) -> &str {
            "mock-bow"
        }
        fn dims(&self) -> usize {
            VOCAB.len()
        }
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(VOCAB
                .iter()
                .map(|w| lower.split_whitespace().filter(|t| t == w).count() as f32)
                .collect())
        }
    }

    fn chunk(id: usize, text: &str, source: &str) -> Chunk {
        Chunk {
            chunk_id: id,
            global_id: id,
            text: text.to_string(),
            source: source.to_string(),
            token_count: text.split_whitespace().count(),
        }
    }

    fn seeded_retriever(top_k: usize) -> Retriever {
        let embedder = Arc::new(MockEmbedder);
        let texts = [
            ("a.txt", "alpha alpha alpha"),
            ("a.txt", "beta beta gamma"),
            ("b.txt", "gamma delta delta"),
        ];

        let mut store = VectorStore::new(embedder.dims());
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, (src, text))| chunk(i, text, src))
            .collect();
        let vectors: Vec<Vec<f32>> = chunks
            .iter()
            .map(|c| embedder.embed(&c.text).unwrap())
            .collect();
        store.add(vectors, chunks).unwrap();

        Retriever::new(embedder, Arc::new(RwLock::new(store)), top_k)
    }

    #[test]
    fn test_retrieve_ranks_by_similarity() {
        let retriever = seeded_retriever(5);
        let results = retriever.retrieve("alpha", None).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.chunk_id, 0);
        assert!((results[0].score - 1.0).abs() < 1e-6);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_top_k_default_and_override() {
        let retriever = seeded_retriever(2);
        assert_eq!(retriever.retrieve("gamma", None).unwrap().len(), 2);
        assert_eq!(retriever.retrieve("gamma", Some(1)).unwrap().len(), 1);
        // Clamped by the store, not an error.
        assert_eq!(retriever.retrieve("gamma", Some(50)).unwrap().len(), 3);
    }

    #[test]
    fn test_retrieve_with_context_format() {
        let retriever = seeded_retriever(2);
        let (context, results) = retriever.retrieve_with_context("delta gamma", None).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.source, "b.txt");

        let blocks: Vec<&str> = context.split("\n\n---\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("[b.txt] (Score: "));
        assert!(blocks[0].ends_with("gamma delta delta"));
        // Blocks preserve descending-score order.
        assert_eq!(blocks[1].lines().last().unwrap(), results[1].chunk.text);
    }

    #[test]
    fn test_empty_store_yields_empty_context() {
        let embedder = Arc::new(MockEmbedder);
        let store = Arc::new(RwLock::new(VectorStore::new(embedder.dims())));
        let retriever = Retriever::new(embedder, store, 5);

        let (context, results) = retriever.retrieve_with_context("alpha", None).unwrap();
        assert!(results.is_empty());
        assert!(context.is_empty());
    }

    #[test]
    fn test_stats_snapshot() {
        let retriever = seeded_retriever(5);
        assert_eq!(
            retriever.stats(),
            RetrieverStats {
                model: "mock-bow".to_string(),
                dims: 4,
                vectors: 3,
                top_k: 5,
            }
        );
    }

    #[test]
    fn test_embedder_store_dimension_mismatch_is_fatal() {
        let embedder = Arc::new(MockEmbedder);
        let store = Arc::new(RwLock::new(VectorStore::new(8)));
        let retriever = Retriever::new(embedder, store.clone(), 5);

        store
            .write()
            .unwrap()
            .add(vec![vec![1.0; 8]], vec![chunk(0, "alpha", "a.txt")])
            .unwrap();
        assert!(retriever.retrieve("alpha", None).is_err());
    }
}
