//! # Passage
//!
//! A local semantic passage retrieval engine: documents in, ranked
//! passages and a formatted context block out.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Filesystem │──▶│ Chunk + Embed │──▶│   Snapshot    │
//! │   source   │   │   pipeline    │   │  vectors.bin  │
//! └────────────┘   └───────────────┘   │ metadata.json │
//!                                      └───────┬───────┘
//!                                              │
//!                                              ▼
//!                                        ┌──────────┐
//!                                        │   CLI    │
//!                                        │  (psg)   │
//!                                        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! psg init                        # write a starter passage.toml
//! psg index                       # chunk + embed the configured source
//! psg search "deployment errors"  # ranked passages
//! psg search "deployment errors" --context
//! psg stats                       # index overview
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`embedding`] | Embedding providers (hashing, OpenAI, Ollama) |
//! | [`source_fs`] | Filesystem document source |
//! | [`ingest`] | Indexing pipeline |
//! | [`search`] | Query pipeline |
//! | [`stats`] | Index statistics |
//!
//! The retrieval engine itself (chunker, vector store, retriever) lives
//! in the `passage-core` crate.

pub mod config;
pub mod embedding;
pub mod ingest;
pub mod search;
pub mod source_fs;
pub mod stats;
