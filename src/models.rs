use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Metadata stored alongside each vector in the knowledge index.
///
/// `text` is the knowledge snippet itself and is required: a match that
/// comes back without it is a malformed record and fails deserialization
/// rather than flowing into prompt construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub text: String,
    /// Source file name, recorded for whole-file ingests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Any additional metadata fields the index stores.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ChunkMetadata {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filename: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// A chunk returned from the vector index, ranked by similarity.
///
/// Sequences of these are ordered descending by `score`; that order is
/// significant and is preserved all the way into the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub id: String,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

impl ScoredChunk {
    /// The knowledge snippet carried by this chunk.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.metadata.text
    }
}

/// Sparse vector companion for hybrid (dense + sparse) indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparseValues {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

/// A record ready to be upserted into the vector index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<SparseValues>,
    pub metadata: ChunkMetadata,
}
