//! OpenAI-compatible dense embedding client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::errors::FitRagError;
use crate::errors::Result;

/// Client for the `/embeddings` endpoint of an OpenAI-compatible API
#[derive(Debug)]
pub struct EmbeddingClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client from configuration
    ///
    /// # Errors
    /// - Missing API key (credentials are checked here, not mid-pipeline)
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.embeddings_api_key().is_empty() {
            return Err(FitRagError::Config(
                "Embeddings API key not configured (set OPENAI_API_KEY or [embeddings].api_key)"
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| FitRagError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: config.embeddings_endpoint().to_string(),
            api_key: config.embeddings_api_key().to_string(),
            model: config.embedding_model().to_string(),
            client,
        })
    }

    /// Model this client embeds with
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct EmbeddingRequest<'a> {
            input: &'a str,
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling embeddings API: {}", url);

        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
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
                "Embeddings API error ({status}): {error_text}"
            )));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| FitRagError::Embedding(format!("Failed to parse response: {e}")))?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| FitRagError::Embedding("No embedding in response".to_string()))
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    /// Generate the dense embedding for a single text
    ///
    /// # Errors
    /// - `InvalidArgument` for empty or whitespace-only input, raised before
    ///   any network traffic
    /// - API request failures (network errors, timeouts, auth failures)
    /// - Invalid API responses (malformed JSON, empty data array)
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(FitRagError::InvalidArgument(
                "Cannot embed empty text".to_string(),
            ));
        }

        self.request_embedding(text).await
    }
}
