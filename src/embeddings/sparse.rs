//! Sparse embedding client backed by the index provider's inference API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::embeddings::SparseEmbedder;
use crate::errors::FitRagError;
use crate::errors::Result;
use crate::index::PINECONE_API_VERSION;
use crate::models::SparseValues;

/// Client for the hosted sparse model (`pinecone-sparse-english-v0`)
pub struct SparseEmbeddingClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl SparseEmbeddingClient {
    /// Create a new sparse embedding client from configuration
    ///
    /// # Errors
    /// - Missing index API key
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.index_api_key().is_empty() {
            return Err(FitRagError::Config(
                "Index API key not configured (set PINECONE_API_KEY or [index].api_key)"
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| FitRagError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: config.control_plane_endpoint().to_string(),
            api_key: config.index_api_key().to_string(),
            model: config.sparse_model().to_string(),
            client,
        })
    }
}

#[async_trait]
impl SparseEmbedder for SparseEmbeddingClient {
    /// Generate the sparse vector for a single passage
    ///
    /// # Errors
    /// - `InvalidArgument` for empty or whitespace-only input
    /// - API request failures and malformed responses
    async fn embed_sparse(&self, text: &str) -> Result<SparseValues> {
        if text.trim().is_empty() {
            return Err(FitRagError::InvalidArgument(
                "Cannot embed empty text".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct InferenceRequest<'a> {
            model: &'a str,
            parameters: InferenceParameters,
            inputs: Vec<InferenceInput<'a>>,
        }

        #[derive(Serialize)]
        struct InferenceParameters {
            input_type: &'static str,
            return_tokens: bool,
        }

        #[derive(Serialize)]
        struct InferenceInput<'a> {
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct InferenceResponse {
            data: Vec<SparseRecord>,
        }

        #[derive(Deserialize)]
        struct SparseRecord {
            sparse_indices: Vec<u32>,
            sparse_values: Vec<f32>,
        }

        let url = format!("{}/embed", self.endpoint);
        debug!("Calling sparse inference API: {}", url);

        let request = InferenceRequest {
            model: &self.model,
            parameters: InferenceParameters {
                input_type: "passage",
                return_tokens: false,
            },
            inputs: vec![InferenceInput { text }],
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| FitRagError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FitRagError::Embedding(format!(
                "Sparse inference API error ({status}): {error_text}"
            )));
        }

        let result: InferenceResponse = response
            .json()
            .await
            .map_err(|e| FitRagError::Embedding(format!("Failed to parse response: {e}")))?;

        result
            .data
            .into_iter()
            .next()
            .map(|r| SparseValues {
                indices: r.sparse_indices,
                values: r.sparse_values,
            })
            .ok_or_else(|| FitRagError::Embedding("No sparse vector in response".to_string()))
    }
}
