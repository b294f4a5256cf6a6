//! TOML configuration parsing and validation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub index: IndexConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    /// Snapshot directory holding the vectors and metadata artifacts.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Tokenizer definition for exact subword counting (`subword` feature).
    #[serde(default)]
    pub tokenizer_file: Option<PathBuf>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            tokenizer_file: None,
        }
    }
}

fn default_chunk_size() -> usize {
    passage_core::chunk::DEFAULT_CHUNK_SIZE
}
fn default_chunk_overlap() -> usize {
    passage_core::chunk::DEFAULT_CHUNK_OVERLAP
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    passage_core::retriever::DEFAULT_TOP_K
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    /// Base URL for the Ollama provider.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: None,
            url: None,
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "hashing".to_string()
}
fn default_batch_size() -> usize {
    32
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string(), "**/*.txt".to_string()]
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.chunk_overlap >= config.chunking.chunk_size {
        anyhow::bail!("chunking.chunk_overlap must be < chunking.chunk_size");
    }

    // Validate retrieval
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    // Validate embedding
    match config.embedding.provider.as_str() {
        "hashing" => {
            if config.embedding.dims == Some(0) {
                anyhow::bail!("embedding.dims must be > 0");
            }
        }
        "openai" | "ollama" => {
            if config.embedding.model.is_none() {
                anyhow::bail!(
                    "embedding.model must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
            if config.embedding.dims.is_none() || config.embedding.dims == Some(0) {
                anyhow::bail!(
                    "embedding.dims must be > 0 when provider is '{}'",
                    config.embedding.provider
                );
            }
        }
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be hashing, openai, or ollama.",
            other
        ),
    }

    Ok(config)
}

/// Commented starter configuration written by `psg init`.
pub const EXAMPLE_CONFIG: &str = r#"[index]
path = "./index"

[chunking]
chunk_size = 800
chunk_overlap = 150
# tokenizer_file = "./tokenizer.json"   # exact subword counting (requires the `subword` feature)

[retrieval]
top_k = 5

[embedding]
# hashing: offline deterministic baseline; openai / ollama: semantic models.
provider = "hashing"
dims = 256
# model = "text-embedding-3-small"      # required for openai/ollama
# url = "http://localhost:11434"        # ollama only
batch_size = 32
max_retries = 5
timeout_secs = 30

[source]
root = "./docs"
include_globs = ["**/*.md", "**/*.txt"]
exclude_globs = []
follow_symlinks = false
"#;

/// Write the starter configuration to `path` unless it already exists.
pub fn run_init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote starter config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("passage.toml");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let (_tmp, path) = write_config("[index]\npath = \"./index\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.chunking.chunk_overlap, 150);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.embedding.provider, "hashing");
        assert!(config.source.is_none());
    }

    #[test]
    fn test_example_config_parses() {
        let (_tmp, path) = write_config(EXAMPLE_CONFIG);
        let config = load_config(&path).unwrap();
        assert_eq!(config.embedding.dims, Some(256));
        let source = config.source.unwrap();
        assert_eq!(source.include_globs.len(), 2);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let (_tmp, path) = write_config(
            "[index]\npath = \"./index\"\n[chunking]\nchunk_size = 100\nchunk_overlap = 100\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let (_tmp, path) =
            write_config("[index]\npath = \"./index\"\n[chunking]\nchunk_size = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_remote_provider_requires_model_and_dims() {
        let (_tmp, path) = write_config(
            "[index]\npath = \"./index\"\n[embedding]\nprovider = \"ollama\"\n",
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("embedding.model"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let (_tmp, path) = write_config(
            "[index]\npath = \"./index\"\n[embedding]\nprovider = \"quantum\"\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_config_file_has_path_context() {
        let err = load_config(Path::new("/nonexistent/passage.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("passage.toml"));
    }
}
