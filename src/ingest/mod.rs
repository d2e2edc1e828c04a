//! Knowledge-base ingestion module
//!
//! Walks a folder of `.txt` files, chunks them (or takes whole files),
//! embeds every chunk, and upserts the records into the vector index
//! under deterministic IDs of the form
//! `id-{media_type}/{file_number}/{chunk_number}`. A failed chunk is
//! logged and counted, never fatal, so long runs can be resumed with
//! [`IngestOptions::resume_from`].

pub mod chunking;

pub use chunking::clean_text;
pub use chunking::split_into_chunks;
pub use chunking::ChunkOptions;

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::embeddings::SparseEmbedder;
use crate::embeddings::SparseEmbeddingClient;
use crate::errors::FitRagError;
use crate::errors::Result;
use crate::index::PineconeIndex;
use crate::index::VectorIndex;
use crate::models::ChunkMetadata;
use crate::models::ChunkRecord;

/// Options for one ingestion run
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Numeric media-type tag in chunk IDs
    pub media_type: u32,
    /// Upsert each file as a single record instead of chunking it
    pub whole_file: bool,
    /// Namespace the records are written to
    pub namespace: Option<String>,
    /// Chunk ID to resume from; earlier chunks are skipped, the named
    /// chunk itself is processed
    pub resume_from: Option<String>,
    /// Run [`clean_text`] over each file before chunking
    pub clean: bool,
    /// Attach sparse vectors from the inference API
    pub use_sparse: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            media_type: 1,
            whole_file: false,
            namespace: None,
            resume_from: None,
            clean: false,
            use_sparse: true,
        }
    }
}

/// Counters for one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    /// `.txt` files found in the folder
    pub files_seen: usize,
    /// Files whose chunks were processed
    pub files_ingested: usize,
    /// Files skipped because they were unreadable or empty
    pub files_skipped: usize,
    pub chunks_upserted: usize,
    /// Chunks passed over while seeking the resume ID
    pub chunks_skipped: usize,
    pub chunks_failed: usize,
}

/// Ingestion service wiring the embedders to the index
pub struct Ingestor {
    embedder: Arc<dyn Embedder>,
    sparse_embedder: Option<Arc<dyn SparseEmbedder>>,
    index: Arc<dyn VectorIndex>,
    chunk_options: ChunkOptions,
}

impl Ingestor {
    /// Create an ingestor wired to the configured services
    ///
    /// # Errors
    /// - Missing credentials for the embeddings or index services
    /// - Invalid chunking configuration (overlap not below max)
    /// - Control-plane failures while resolving the index host
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let chunk_options = ChunkOptions {
            min_words: config.min_chunk_words(),
            max_words: config.max_chunk_words(),
            overlap_words: config.overlap_words(),
        };
        validate_chunk_options(&chunk_options)?;

        let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingClient::new(config)?);
        let sparse_embedder: Arc<dyn SparseEmbedder> =
            Arc::new(SparseEmbeddingClient::new(config)?);
        let index: Arc<dyn VectorIndex> = Arc::new(PineconeIndex::connect(config).await?);

        Ok(Self {
            embedder,
            sparse_embedder: Some(sparse_embedder),
            index,
            chunk_options,
        })
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(
        embedder: Arc<dyn Embedder>,
        sparse_embedder: Option<Arc<dyn SparseEmbedder>>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            embedder,
            sparse_embedder,
            index,
            chunk_options: ChunkOptions::default(),
        }
    }

    /// Replace the chunking parameters
    #[must_use]
    pub fn with_chunk_options(mut self, chunk_options: ChunkOptions) -> Self {
        self.chunk_options = chunk_options;
        self
    }

    /// Ingest every `.txt` file in a folder.
    ///
    /// Files are processed in sorted filename order so the generated IDs
    /// are stable across runs; that is what makes `resume_from` work.
    ///
    /// # Errors
    /// - IO errors listing the folder. Per-file and per-chunk failures
    ///   are logged and counted instead of aborting the run.
    pub async fn ingest_folder(
        &self,
        folder: &Path,
        options: &IngestOptions,
    ) -> Result<IngestStats> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        info!(
            "Ingesting {} text files from {}",
            files.len(),
            folder.display()
        );

        let mut stats = IngestStats::default();
        let mut resume_from = options.resume_from.clone();
        let mut file_number = 0usize;

        for path in files {
            stats.files_seen += 1;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .to_string();
            info!("Processing {}", file_name);

            let text = match std::fs::read_to_string(&path) {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => {
                    warn!("Skipping empty file {}", file_name);
                    stats.files_skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Error reading file {}: {}", file_name, e);
                    stats.files_skipped += 1;
                    continue;
                }
            };
            // Skipped files do not consume a file number.
            file_number += 1;

            let text = if options.clean { clean_text(&text) } else { text };

            let chunks = if options.whole_file {
                vec![text]
            } else {
                split_into_chunks(&text, &self.chunk_options)
            };
            let filename_meta = options.whole_file.then_some(file_name.as_str());

            for (chunk_index, chunk) in chunks.iter().enumerate() {
                let chunk_id = format!(
                    "id-{}/{}/{}",
                    options.media_type,
                    file_number,
                    chunk_index + 1
                );

                // Seek forward to the resume point; the named chunk is
                // the first one processed.
                if let Some(resume_id) = &resume_from {
                    if chunk_id != *resume_id {
                        stats.chunks_skipped += 1;
                        continue;
                    }
                    resume_from = None;
                }

                match self
                    .upsert_chunk(&chunk_id, chunk, filename_meta, options)
                    .await
                {
                    Ok(()) => {
                        info!("Upserted {}", chunk_id);
                        stats.chunks_upserted += 1;
                    }
                    Err(e) => {
                        warn!("Failed to ingest {}: {}", chunk_id, e);
                        stats.chunks_failed += 1;
                    }
                }
            }

            stats.files_ingested += 1;
        }

        info!(
            "Ingestion complete: {} chunks upserted, {} skipped, {} failed across {} files",
            stats.chunks_upserted, stats.chunks_skipped, stats.chunks_failed, stats.files_ingested
        );
        Ok(stats)
    }

    async fn upsert_chunk(
        &self,
        chunk_id: &str,
        text: &str,
        filename: Option<&str>,
        options: &IngestOptions,
    ) -> Result<()> {
        let values = self.embedder.embed(text).await?;

        let sparse_values = match (&self.sparse_embedder, options.use_sparse) {
            (Some(sparse), true) => Some(sparse.embed_sparse(text).await?),
            _ => None,
        };

        let mut metadata = ChunkMetadata::from_text(text);
        metadata.filename = filename.map(str::to_string);

        let record = ChunkRecord {
            id: chunk_id.to_string(),
            values,
            sparse_values,
            metadata,
        };

        self.index
            .upsert(&[record], options.namespace.as_deref())
            .await?;
        Ok(())
    }
}

fn validate_chunk_options(options: &ChunkOptions) -> Result<()> {
    if options.max_words == 0 || options.overlap_words >= options.max_words {
        return Err(FitRagError::Config(format!(
            "Invalid chunking: overlap_words ({}) must be smaller than max_chunk_words ({})",
            options.overlap_words, options.max_words
        )));
    }
    Ok(())
}
