use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::embeddings::DEFAULT_DENSE_MODEL;
use crate::embeddings::DEFAULT_EMBEDDING_DIM;
use crate::embeddings::DEFAULT_SPARSE_MODEL;
use crate::index::DEFAULT_TOP_K;
use crate::llm::DEFAULT_LLM_MODEL;
use crate::rag::DEFAULT_USER_NAME;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_embeddings_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

pub fn default_embeddings_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_embedding_model() -> String {
    DEFAULT_DENSE_MODEL.to_string()
}

pub fn default_embedding_dimension() -> usize {
    DEFAULT_EMBEDDING_DIM
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_index_name")]
    pub name: String,
    /// Control-plane endpoint, used to resolve the index host and to
    /// create indexes.
    #[serde(default = "default_control_plane_endpoint")]
    pub control_plane_endpoint: String,
    #[serde(default = "default_index_cloud")]
    pub cloud: String,
    #[serde(default = "default_index_region")]
    pub region: String,
    #[serde(default = "default_index_metric")]
    pub metric: String,
    #[serde(default = "default_sparse_model")]
    pub sparse_model: String,
}

pub fn default_index_name() -> String {
    "fitrag-knowledge".to_string()
}

pub fn default_control_plane_endpoint() -> String {
    "https://api.pinecone.io".to_string()
}

pub fn default_index_cloud() -> String {
    "aws".to_string()
}

pub fn default_index_region() -> String {
    "us-east-1".to_string()
}

pub fn default_index_metric() -> String {
    "dotproduct".to_string()
}

pub fn default_sparse_model() -> String {
    DEFAULT_SPARSE_MODEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// When unset, the model's own sampling defaults apply.
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

pub fn default_llm_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default)]
    pub user_profile: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

pub fn default_user_name() -> String {
    DEFAULT_USER_NAME.to_string()
}

pub fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            user_name: default_user_name(),
            user_profile: String::new(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Numeric media-type tag used in chunk IDs (1 = text books, 2 = video
    /// transcripts).
    #[serde(default = "default_media_type")]
    pub media_type: u32,
    #[serde(default = "default_min_chunk_words")]
    pub min_chunk_words: usize,
    #[serde(default = "default_max_chunk_words")]
    pub max_chunk_words: usize,
    #[serde(default = "default_overlap_words")]
    pub overlap_words: usize,
}

pub fn default_media_type() -> u32 {
    1
}

pub fn default_min_chunk_words() -> usize {
    200
}

pub fn default_max_chunk_words() -> usize {
    300
}

pub fn default_overlap_words() -> usize {
    20
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            media_type: default_media_type(),
            min_chunk_words: default_min_chunk_words(),
            max_chunk_words: default_max_chunk_words(),
            overlap_words: default_overlap_words(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub embeddings: EmbeddingsConfig,
    pub index: IndexConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::FitRagError::Io)?;

        let config: AppConfig = toml::from_str(&content).map_err(crate::FitRagError::TomlParsing)?;

        Ok(config)
    }

    /// Load configuration from the default config file path, then apply
    /// environment overrides for the API credentials.
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        let mut config = if Path::new("config.toml").exists() {
            Self::from_file("config.toml")?
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")?
        } else {
            return Err(crate::FitRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )));
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Override the secrets and index name from the environment when set.
    ///
    /// Recognized variables: `OPENAI_API_KEY`, `PINECONE_API_KEY`,
    /// `PINECONE_INDEX`, `GEMINI_API_KEY`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                self.embeddings.api_key = key;
            }
        }
        if let Ok(key) = std::env::var("PINECONE_API_KEY") {
            if !key.is_empty() {
                self.index.api_key = key;
            }
        }
        if let Ok(name) = std::env::var("PINECONE_INDEX") {
            if !name.is_empty() {
                self.index.name = name;
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.llm.api_key = key;
            }
        }
    }

    /// Get embeddings API endpoint
    pub fn embeddings_endpoint(&self) -> &str {
        &self.embeddings.endpoint
    }

    /// Get embeddings API key
    pub fn embeddings_api_key(&self) -> &str {
        &self.embeddings.api_key
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get vector index API key
    pub fn index_api_key(&self) -> &str {
        &self.index.api_key
    }

    /// Get vector index name
    pub fn index_name(&self) -> &str {
        &self.index.name
    }

    /// Get vector index control-plane endpoint
    pub fn control_plane_endpoint(&self) -> &str {
        &self.index.control_plane_endpoint
    }

    /// Get cloud provider for index creation
    pub fn index_cloud(&self) -> &str {
        &self.index.cloud
    }

    /// Get cloud region for index creation
    pub fn index_region(&self) -> &str {
        &self.index.region
    }

    /// Get similarity metric for index creation
    pub fn index_metric(&self) -> &str {
        &self.index.metric
    }

    /// Get sparse embedding model name
    pub fn sparse_model(&self) -> &str {
        &self.index.sparse_model
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM API key
    pub fn llm_api_key(&self) -> &str {
        &self.llm.api_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get LLM sampling temperature, if configured
    pub fn llm_temperature(&self) -> Option<f32> {
        self.llm.temperature
    }

    /// Get LLM output token cap, if configured
    pub fn llm_max_output_tokens(&self) -> Option<u32> {
        self.llm.max_output_tokens
    }

    /// Get default user name for prompts
    pub fn user_name(&self) -> &str {
        &self.assistant.user_name
    }

    /// Get default user profile for prompts
    pub fn user_profile(&self) -> &str {
        &self.assistant.user_profile
    }

    /// Get default retrieval depth
    pub fn top_k(&self) -> usize {
        self.assistant.top_k
    }

    /// Get media-type tag for chunk IDs
    pub fn media_type(&self) -> u32 {
        self.ingest.media_type
    }

    /// Get minimum words for a kept chunk
    pub fn min_chunk_words(&self) -> usize {
        self.ingest.min_chunk_words
    }

    /// Get maximum words per chunk
    pub fn max_chunk_words(&self) -> usize {
        self.ingest.max_chunk_words
    }

    /// Get words carried over between adjacent chunks
    pub fn overlap_words(&self) -> usize {
        self.ingest.overlap_words
    }

    /// Get log level
    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// Check if backtraces are enabled
    pub fn backtrace_enabled(&self) -> bool {
        self.logging.backtrace
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            embeddings: EmbeddingsConfig {
                endpoint: default_embeddings_endpoint(),
                api_key: String::new(),
                model: default_embedding_model(),
                dimension: default_embedding_dimension(),
            },
            index: IndexConfig {
                api_key: String::new(),
                name: default_index_name(),
                control_plane_endpoint: default_control_plane_endpoint(),
                cloud: default_index_cloud(),
                region: default_index_region(),
                metric: default_index_metric(),
                sparse_model: default_sparse_model(),
            },
            llm: LlmConfig {
                endpoint: default_llm_endpoint(),
                api_key: String::new(),
                model: default_llm_model(),
                temperature: None,
                max_output_tokens: None,
            },
            assistant: AssistantConfig::default(),
            ingest: IngestConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let toml_str = r#"
[embeddings]
api_key = "sk-test"

[index]
api_key = "pc-test"
name = "health-kb"

[llm]
api_key = "g-test"

[logging]
level = "debug"
backtrace = false
"#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.embedding_model(), "text-embedding-3-large");
        assert_eq!(config.embedding_dimension(), 3072);
        assert_eq!(config.index_name(), "health-kb");
        assert_eq!(config.index_metric(), "dotproduct");
        assert_eq!(config.llm_model(), "gemini-2.0-flash");
        assert_eq!(config.llm_temperature(), None);
        assert_eq!(config.user_name(), "User");
        assert_eq!(config.top_k(), 10);
        assert_eq!(config.min_chunk_words(), 200);
        assert_eq!(config.max_chunk_words(), 300);
        assert_eq!(config.overlap_words(), 20);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_full_sections_override_defaults() {
        let toml_str = r#"
[embeddings]
endpoint = "http://localhost:8080/v1"
api_key = "sk-test"
model = "text-embedding-ada-002"
dimension = 1536

[index]
api_key = "pc-test"
name = "health-kb"
metric = "cosine"

[llm]
api_key = "g-test"
temperature = 0.4
max_output_tokens = 1024

[assistant]
user_name = "Kaloyan"
top_k = 5

[ingest]
media_type = 2
max_chunk_words = 400

[logging]
level = "info"
backtrace = true
"#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.embeddings_endpoint(), "http://localhost:8080/v1");
        assert_eq!(config.embedding_dimension(), 1536);
        assert_eq!(config.index_metric(), "cosine");
        assert_eq!(config.llm_temperature(), Some(0.4));
        assert_eq!(config.llm_max_output_tokens(), Some(1024));
        assert_eq!(config.user_name(), "Kaloyan");
        assert_eq!(config.top_k(), 5);
        assert_eq!(config.media_type(), 2);
        assert_eq!(config.max_chunk_words(), 400);
        // Untouched ingest fields keep their defaults.
        assert_eq!(config.min_chunk_words(), 200);
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        std::env::set_var("OPENAI_API_KEY", "env-openai");
        std::env::set_var("PINECONE_API_KEY", "env-pinecone");
        std::env::set_var("PINECONE_INDEX", "env-index");
        std::env::set_var("GEMINI_API_KEY", "env-gemini");

        config.apply_env_overrides();

        assert_eq!(config.embeddings_api_key(), "env-openai");
        assert_eq!(config.index_api_key(), "env-pinecone");
        assert_eq!(config.index_name(), "env-index");
        assert_eq!(config.llm_api_key(), "env-gemini");

        std::env::remove_var("OPENAI_API_KEY");
        std::env::remove_var("PINECONE_API_KEY");
        std::env::remove_var("PINECONE_INDEX");
        std::env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    fn test_default_config_is_complete() {
        let config = AppConfig::default();
        assert_eq!(config.embeddings_endpoint(), "https://api.openai.com/v1");
        assert_eq!(
            config.control_plane_endpoint(),
            "https://api.pinecone.io"
        );
        assert_eq!(config.index_cloud(), "aws");
        assert_eq!(config.index_region(), "us-east-1");
        assert_eq!(config.sparse_model(), "pinecone-sparse-english-v0");
        assert_eq!(
            config.llm_endpoint(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.media_type(), 1);
    }
}
