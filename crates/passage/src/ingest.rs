//! Indexing pipeline orchestration.
//!
//! Coordinates the full indexing flow: filesystem scan → chunking →
//! embedding → vector store → snapshot. Each `psg index` run rebuilds the
//! snapshot from a fresh scan, which keeps `global_id` numbering dense
//! across the whole batch.

use anyhow::{anyhow, Result};

use passage_core::chunk::TextChunker;
use passage_core::store::VectorStore;

use crate::config::{ChunkingConfig, Config};
use crate::embedding;
use crate::source_fs;

pub fn run_index(config: &Config, dry_run: bool, limit: Option<usize>) -> Result<()> {
    let source = config
        .source
        .as_ref()
        .ok_or_else(|| anyhow!("[source] section required for indexing"))?;

    let mut documents = source_fs::scan_documents(source)?;
    if let Some(lim) = limit {
        documents.truncate(lim);
    }

    let chunker = build_chunker(&config.chunking)?;
    let chunks = chunker.chunk_documents(&documents);

    if dry_run {
        println!("index (dry-run)");
        println!("  documents found: {}", documents.len());
        println!("  chunks: {}", chunks.len());
        return Ok(());
    }

    let embedder = embedding::create_embedder(&config.embedding)?;
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed_batch(&texts)?;

    let mut store = VectorStore::new(embedder.dims());
    store.add(vectors, chunks)?;
    store.save(&config.index.path)?;

    println!("index ok");
    println!("  documents indexed: {}", documents.len());
    println!("  chunks embedded:   {}", store.len());
    println!("  dimension:         {}", store.dims());
    println!("  snapshot:          {}", config.index.path.display());

    Ok(())
}

/// Delete the index snapshot artifacts.
pub fn run_clear(config: &Config) -> Result<()> {
    if VectorStore::remove_snapshot(&config.index.path)? {
        println!("Index cleared: {}", config.index.path.display());
    } else {
        println!("No index snapshot at {}", config.index.path.display());
    }
    Ok(())
}

/// Build the chunker from configuration.
///
/// With the `subword` feature and a configured `tokenizer_file`, token
/// counts come from the exact subword tokenizer; otherwise whitespace
/// word counting is used.
pub fn build_chunker(config: &ChunkingConfig) -> Result<TextChunker> {
    #[cfg(feature = "subword")]
    {
        if let Some(path) = &config.tokenizer_file {
            let counter = passage_core::tokenizer::SubwordCounter::from_file(path)?;
            return Ok(TextChunker::with_counter(
                config.chunk_size,
                config.chunk_overlap,
                Box::new(counter),
            ));
        }
    }
    #[cfg(not(feature = "subword"))]
    {
        if config.tokenizer_file.is_some() {
            eprintln!(
                "chunking.tokenizer_file is set but the `subword` feature is not enabled; \
                 falling back to whitespace word counting"
            );
        }
    }
    Ok(TextChunker::new(config.chunk_size, config.chunk_overlap))
}
