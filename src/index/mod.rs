//! Vector index module
//!
//! Query and upsert against a Pinecone-compatible vector index over HTTP,
//! plus the control-plane operations needed to create indexes and resolve
//! their data-plane hosts.

pub mod pinecone;

pub use pinecone::IndexDescription;
pub use pinecone::PineconeIndex;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::ChunkRecord;
use crate::models::ScoredChunk;

/// Default number of chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 10;

/// REST API version header value sent to the index provider
pub const PINECONE_API_VERSION: &str = "2025-01";

/// Anything that can rank stored chunks against a query vector and accept
/// new chunk records.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` chunks ranked by similarity, best first.
    /// The service's ordering is preserved as-is.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Store chunk records, optionally under a namespace. Returns the
    /// number of records the index accepted.
    async fn upsert(&self, records: &[ChunkRecord], namespace: Option<&str>) -> Result<usize>;
}
