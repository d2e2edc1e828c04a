//! Complete assistant pipeline: Embed -> Retrieve -> Generate

use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::errors::Result;
use crate::index::PineconeIndex;
use crate::index::VectorIndex;
use crate::index::DEFAULT_TOP_K;
use crate::llm::GeminiClient;
use crate::llm::TextGenerator;
use crate::models::ScoredChunk;
use crate::rag::build_assistant_prompt;
use crate::rag::DEFAULT_USER_NAME;
use crate::rag::NO_CONTEXT_MESSAGE;
use crate::rag::PIPELINE_ERROR_MESSAGE;

/// A question for the assistant, with optional personalization
#[derive(Debug, Clone)]
pub struct AskRequest {
    pub question: String,
    /// Name the answer is addressed to; falls back to the configured
    /// default, then to "User".
    pub user_name: Option<String>,
    /// Free-text profile of the person asking
    pub user_profile: Option<String>,
    /// Retrieval depth; falls back to the configured default
    pub top_k: Option<usize>,
}

impl AskRequest {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            user_name: None,
            user_profile: None,
            top_k: None,
        }
    }
}

/// A fully answered query
#[derive(Debug, Clone)]
pub struct AssistantResponse {
    /// The model's answer text, untouched
    pub answer: String,
    /// Chunks the answer was grounded on, in ranked order
    pub sources: Vec<ScoredChunk>,
    pub question: String,
}

/// Terminal pipeline states short of an error.
///
/// An empty retrieval is a designed outcome, not a failure, so it gets
/// its own variant instead of an error.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The generator produced an answer from retrieved context
    Answered(AssistantResponse),
    /// Retrieval found nothing; generation was skipped entirely
    NoMatches,
}

/// The assistant pipeline
pub struct Assistant {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn TextGenerator>,
    user_name: String,
    user_profile: String,
    top_k: usize,
}

impl Assistant {
    /// Create a new assistant wired to the configured services
    ///
    /// # Errors
    /// - Missing credentials for any of the three services
    /// - Control-plane failures while resolving the index host
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingClient::new(config)?);
        let index: Arc<dyn VectorIndex> = Arc::new(PineconeIndex::connect(config).await?);
        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(config)?);

        Ok(Self {
            embedder,
            index,
            generator,
            user_name: config.user_name().to_string(),
            user_profile: config.user_profile().to_string(),
            top_k: config.top_k(),
        })
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
            user_name: DEFAULT_USER_NAME.to_string(),
            user_profile: String::new(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Ask a question with the default personalization
    ///
    /// # Errors
    /// - Same as [`Assistant::ask_with_options`]
    pub async fn ask(&self, question: &str) -> Result<QueryOutcome> {
        self.ask_with_options(AskRequest::new(question)).await
    }

    /// Run the full pipeline for one question
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty question
    /// - Embedding errors (API failures, malformed responses)
    /// - Retrieval errors (index failures, malformed matches)
    /// - Generation errors (API failures, empty candidates)
    pub async fn ask_with_options(&self, request: AskRequest) -> Result<QueryOutcome> {
        info!("Processing query: {}", request.question);

        // Step 1: Embed the question
        debug!("Step 1: Embedding query");
        let vector = self.embedder.embed(&request.question).await?;

        // Step 2: Retrieve relevant chunks
        debug!("Step 2: Retrieving context");
        let top_k = request.top_k.unwrap_or(self.top_k);
        let chunks = self.index.query(&vector, top_k).await?;
        debug!("Retrieved {} chunks", chunks.len());

        if chunks.is_empty() {
            info!("No relevant context found; skipping generation");
            return Ok(QueryOutcome::NoMatches);
        }

        // Step 3: Generate the answer
        debug!("Step 3: Generating answer");
        let user_name = request.user_name.as_deref().unwrap_or(&self.user_name);
        let user_profile = request
            .user_profile
            .as_deref()
            .unwrap_or(&self.user_profile);
        let prompt = build_assistant_prompt(&request.question, user_name, user_profile, &chunks);
        let answer = self.generator.generate(&prompt).await?;

        info!("Query answered from {} source chunks", chunks.len());

        Ok(QueryOutcome::Answered(AssistantResponse {
            answer,
            sources: chunks,
            question: request.question,
        }))
    }

    /// Answer a question, mapping every outcome to user-facing text.
    ///
    /// This is the single place pipeline errors are caught: whatever
    /// stage failed, the caller sees the same generic message while the
    /// underlying error goes to the log. An empty retrieval maps to the
    /// fixed no-information reply.
    pub async fn process_request(&self, request: AskRequest) -> String {
        match self.ask_with_options(request).await {
            Ok(QueryOutcome::Answered(response)) => response.answer,
            Ok(QueryOutcome::NoMatches) => NO_CONTEXT_MESSAGE.to_string(),
            Err(e) => {
                error!("Error processing query: {}", e);
                PIPELINE_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// [`Assistant::process_request`] without the request struct
    pub async fn process_query(
        &self,
        question: &str,
        user_name: Option<&str>,
        user_profile: Option<&str>,
    ) -> String {
        let request = AskRequest {
            question: question.to_string(),
            user_name: user_name.map(str::to_string),
            user_profile: user_profile.map(str::to_string),
            top_k: None,
        };
        self.process_request(request).await
    }

    /// Retrieve ranked chunks for a question without generating an answer
    ///
    /// # Errors
    /// - Embedding errors
    /// - Retrieval errors
    pub async fn search(&self, question: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        let vector = self.embedder.embed(question).await?;
        self.index.query(&vector, top_k).await
    }
}
