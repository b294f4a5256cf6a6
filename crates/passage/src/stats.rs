//! Index statistics and health overview.
//!
//! Gives a quick summary of what's indexed: snapshot location and size,
//! vector count, dimension, and the retrieval configuration in effect.
//! Used by `psg stats` to confirm that indexing worked as expected.

use anyhow::Result;

use passage_core::store::VectorStore;

use crate::config::Config;

pub fn run_stats(config: &Config) -> Result<()> {
    println!("Passage — Index Stats");
    println!("=====================");
    println!();

    match VectorStore::load(&config.index.path) {
        Ok(store) => {
            println!("  Snapshot:   {}", config.index.path.display());
            println!("  Size:       {}", format_bytes(snapshot_size(config)));
            println!("  Vectors:    {}", store.len());
            println!("  Dimension:  {}", store.dims());
        }
        Err(_) => {
            println!(
                "  Snapshot:   {} (not built yet — run `psg index`)",
                config.index.path.display()
            );
            println!("  Vectors:    0");
        }
    }

    println!("  Provider:   {}", config.embedding.provider);
    if let Some(model) = &config.embedding.model {
        println!("  Model:      {}", model);
    }
    println!("  Top-k:      {}", config.retrieval.top_k);
    println!();

    Ok(())
}

fn snapshot_size(config: &Config) -> u64 {
    ["vectors.bin", "metadata.json"]
        .iter()
        .map(|name| {
            std::fs::metadata(config.index.path.join(name))
                .map(|m| m.len())
                .unwrap_or(0)
        })
        .sum()
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
