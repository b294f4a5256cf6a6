//! # Passage Core
//!
//! The retrieval engine behind Passage: data models, sentence-boundary
//! chunking, an exact-similarity vector store with snapshot persistence,
//! and the retriever that composes an embedding backend with the store.
//!
//! This crate contains no network clients, CLI wiring, or configuration
//! parsing — those live in the `passage` app crate. Embedding is an
//! opaque capability behind the [`embedding::Embedder`] trait; text
//! extraction and answer generation are external collaborators.

pub mod chunk;
pub mod embedding;
pub mod models;
pub mod retriever;
pub mod store;
pub mod tokenizer;
