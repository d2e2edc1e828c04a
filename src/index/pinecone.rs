//! Pinecone-compatible vector index client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::FitRagError;
use crate::errors::Result;
use crate::index::VectorIndex;
use crate::index::PINECONE_API_VERSION;
use crate::models::ChunkRecord;
use crate::models::ScoredChunk;

/// Description of an index as reported by the control plane
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    /// Data-plane host queries are sent to
    pub host: String,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: String,
}

/// Data-plane client for a single index
#[derive(Debug)]
pub struct PineconeIndex {
    host: String,
    api_key: String,
    client: Client,
}

impl PineconeIndex {
    /// Connect to the configured index, resolving its data-plane host via
    /// the control plane.
    ///
    /// # Errors
    /// - Missing API key or index name
    /// - Control-plane failures (index not found, network errors)
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let description = Self::describe_index(config).await?;
        info!(
            "Connected to index '{}' (dimension {}, metric {})",
            description.name, description.dimension, description.metric
        );
        Self::with_host(config.index_api_key(), description.host)
    }

    /// Build a client for a known data-plane host, skipping the control
    /// plane.
    pub fn with_host(api_key: impl Into<String>, host: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(FitRagError::Config(
                "Index API key not configured (set PINECONE_API_KEY or [index].api_key)"
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| FitRagError::Http(e.to_string()))?;

        let host = host.into();
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("https://{host}")
        };

        Ok(Self {
            host,
            api_key,
            client,
        })
    }

    /// List the names of all indexes in the project
    ///
    /// # Errors
    /// - Control-plane request failures
    pub async fn list_indexes(config: &AppConfig) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct ListResponse {
            indexes: Vec<ListedIndex>,
        }

        #[derive(Deserialize)]
        struct ListedIndex {
            name: String,
        }

        let url = format!("{}/indexes", config.control_plane_endpoint());
        let response = control_request(config, |c| c.get(&url)).await?;

        let result: ListResponse = response
            .json()
            .await
            .map_err(|e| FitRagError::Retrieval(format!("Failed to parse response: {e}")))?;

        Ok(result.indexes.into_iter().map(|i| i.name).collect())
    }

    /// Describe the configured index, including its data-plane host
    ///
    /// # Errors
    /// - Control-plane request failures (including a missing index)
    pub async fn describe_index(config: &AppConfig) -> Result<IndexDescription> {
        let url = format!(
            "{}/indexes/{}",
            config.control_plane_endpoint(),
            config.index_name()
        );
        let response = control_request(config, |c| c.get(&url)).await?;

        response
            .json()
            .await
            .map_err(|e| FitRagError::Retrieval(format!("Failed to parse response: {e}")))
    }

    /// Create the configured index (serverless, with the configured
    /// dimension, metric, cloud, and region)
    ///
    /// # Errors
    /// - Control-plane request failures (including name conflicts)
    pub async fn create_index(config: &AppConfig) -> Result<()> {
        #[derive(Serialize)]
        struct CreateRequest<'a> {
            name: &'a str,
            dimension: usize,
            metric: &'a str,
            spec: CreateSpec<'a>,
        }

        #[derive(Serialize)]
        struct CreateSpec<'a> {
            serverless: ServerlessSpec<'a>,
        }

        #[derive(Serialize)]
        struct ServerlessSpec<'a> {
            cloud: &'a str,
            region: &'a str,
        }

        let request = CreateRequest {
            name: config.index_name(),
            dimension: config.embedding_dimension(),
            metric: config.index_metric(),
            spec: CreateSpec {
                serverless: ServerlessSpec {
                    cloud: config.index_cloud(),
                    region: config.index_region(),
                },
            },
        };

        let url = format!("{}/indexes", config.control_plane_endpoint());
        control_request(config, |c| c.post(&url).json(&request)).await?;

        info!(
            "Created index '{}' (dimension {}, metric {})",
            config.index_name(),
            config.embedding_dimension(),
            config.index_metric()
        );
        Ok(())
    }

    /// Create the configured index if it does not exist yet. Returns true
    /// when a new index was created.
    ///
    /// # Errors
    /// - Control-plane request failures
    pub async fn ensure_index(config: &AppConfig) -> Result<bool> {
        let existing = Self::list_indexes(config).await?;
        if existing.iter().any(|name| name == config.index_name()) {
            debug!("Index '{}' already exists", config.index_name());
            return Ok(false);
        }

        Self::create_index(config).await?;
        Ok(true)
    }
}

/// Send a control-plane request with the standard headers and map
/// non-success statuses to retrieval errors.
async fn control_request(
    config: &AppConfig,
    build: impl FnOnce(&Client) -> reqwest::RequestBuilder,
) -> Result<reqwest::Response> {
    if config.index_api_key().is_empty() {
        return Err(FitRagError::Config(
            "Index API key not configured (set PINECONE_API_KEY or [index].api_key)".to_string(),
        ));
    }

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .map_err(|e| FitRagError::Http(e.to_string()))?;

    let response = build(&client)
        .header("Api-Key", config.index_api_key())
        .header("Content-Type", "application/json")
        .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
        .send()
        .await
        .map_err(|e| FitRagError::Http(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(FitRagError::Retrieval(format!(
            "Index control-plane error ({status}): {error_text}"
        )));
    }

    Ok(response)
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    /// Query the index for the chunks nearest to `vector`
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty query vector, raised before any
    ///   network traffic
    /// - API request failures and malformed responses (a match without
    ///   `metadata.text` is malformed)
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        if vector.is_empty() {
            return Err(FitRagError::InvalidArgument(
                "Cannot query with an empty vector".to_string(),
            ));
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct QueryRequest<'a> {
            vector: &'a [f32],
            top_k: usize,
            include_metadata: bool,
        }

        #[derive(Deserialize)]
        struct QueryResponse {
            #[serde(default)]
            matches: Vec<ScoredChunk>,
        }

        let url = format!("{}/query", self.host);
        debug!("Querying index: {} (top_k {})", url, top_k);

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
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
            return Err(FitRagError::Retrieval(format!(
                "Index query error ({status}): {error_text}"
            )));
        }

        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| FitRagError::Retrieval(format!("Failed to parse response: {e}")))?;

        debug!("Index returned {} matches", result.matches.len());
        Ok(result.matches)
    }

    /// Upsert chunk records into the index
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty record batch
    /// - API request failures and malformed responses
    async fn upsert(&self, records: &[ChunkRecord], namespace: Option<&str>) -> Result<usize> {
        if records.is_empty() {
            return Err(FitRagError::InvalidArgument(
                "Cannot upsert an empty record batch".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct UpsertRequest<'a> {
            vectors: &'a [ChunkRecord],
            #[serde(skip_serializing_if = "Option::is_none")]
            namespace: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct UpsertResponse {
            #[serde(rename = "upsertedCount")]
            upserted_count: usize,
        }

        let url = format!("{}/vectors/upsert", self.host);
        debug!("Upserting {} records to {}", records.len(), url);

        let request = UpsertRequest {
            vectors: records,
            namespace,
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
            return Err(FitRagError::Ingest(format!(
                "Index upsert error ({status}): {error_text}"
            )));
        }

        let result: UpsertResponse = response
            .json()
            .await
            .map_err(|e| FitRagError::Ingest(format!("Failed to parse response: {e}")))?;

        Ok(result.upserted_count)
    }
}
