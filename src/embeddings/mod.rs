//! Embedding generation module
//!
//! Turns text into the fixed-length dense vectors the knowledge index is
//! queried with, via an OpenAI-compatible embeddings API, plus optional
//! sparse vectors from the index provider's inference API for hybrid
//! indexes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fitrag::config::AppConfig;
//! use fitrag::embeddings::Embedder;
//! use fitrag::embeddings::EmbeddingClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::new(&config)?;
//!
//!     let embedding = client.embed("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod sparse;

pub use client::EmbeddingClient;
pub use sparse::SparseEmbeddingClient;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::SparseValues;

/// Default dense embedding model
pub const DEFAULT_DENSE_MODEL: &str = "text-embedding-3-large";

/// Dimension of the default dense model
pub const DEFAULT_EMBEDDING_DIM: usize = 3072;

/// Older dense model kept for indexes built before the default changed
pub const LEGACY_DENSE_MODEL: &str = "text-embedding-ada-002";

/// Dimension of the legacy dense model
pub const LEGACY_EMBEDDING_DIM: usize = 1536;

/// Default sparse embedding model served by the index provider
pub const DEFAULT_SPARSE_MODEL: &str = "pinecone-sparse-english-v0";

/// Anything that can turn text into a dense query vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text. Empty or whitespace-only input is rejected
    /// with `InvalidArgument` before any request is made.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Anything that can turn text into a sparse vector for hybrid indexes.
#[async_trait]
pub trait SparseEmbedder: Send + Sync {
    async fn embed_sparse(&self, text: &str) -> Result<SparseValues>;
}
