//! Query pipeline and result printing.

use std::sync::{Arc, RwLock};

use anyhow::{bail, Context, Result};

use passage_core::retriever::Retriever;
use passage_core::store::VectorStore;

use crate::config::Config;
use crate::embedding;

pub fn run_search(config: &Config, query: &str, k: Option<usize>, show_context: bool) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let store = VectorStore::load(&config.index.path).with_context(|| {
        format!(
            "no usable index snapshot at {} (run `psg index` first)",
            config.index.path.display()
        )
    })?;

    let embedder = embedding::create_embedder(&config.embedding)?;
    if embedder.dims() != store.dims() {
        bail!(
            "embedding dimension {} does not match index dimension {}; \
             re-run `psg index` after changing embedding settings",
            embedder.dims(),
            store.dims()
        );
    }

    let retriever = Retriever::new(
        Arc::from(embedder),
        Arc::new(RwLock::new(store)),
        config.retrieval.top_k,
    );

    let (context, results) = retriever.retrieve_with_context(query, k)?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let snippet: String = result.chunk.text.chars().take(240).collect();
        println!(
            "{}. [{:.4}] {} (chunk {}, global {})",
            rank + 1,
            result.score,
            result.chunk.source,
            result.chunk.chunk_id,
            result.chunk.global_id
        );
        println!("   {}", snippet);
        println!();
    }

    if show_context {
        println!("--- context ---");
        println!("{}", context);
    }

    Ok(())
}
