use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitRagError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error("Vector index request failed: {0}")]
    Retrieval(String),

    #[error("Generation request failed: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ingestion error: {0}")]
    Ingest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FitRagError>;
