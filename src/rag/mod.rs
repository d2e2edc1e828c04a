//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end query answering for the health assistant:
//! - Query embedding via the configured embeddings API
//! - Semantic retrieval from the vector index
//! - Prompt construction from the ranked chunks
//! - LLM-based answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use fitrag::config::AppConfig;
//! use fitrag::rag::Assistant;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let assistant = Assistant::new(&config).await?;
//!
//!     let answer = assistant.process_query("How do I sleep better?", None, None).await;
//!     println!("{answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod pipeline;
pub mod prompts;

pub use pipeline::AskRequest;
pub use pipeline::Assistant;
pub use pipeline::AssistantResponse;
pub use pipeline::QueryOutcome;
pub use prompts::build_assistant_prompt;
pub use prompts::format_context;

/// Reply used when retrieval finds nothing relevant. Callers of
/// `process_query` see exactly this string, never an empty answer.
pub const NO_CONTEXT_MESSAGE: &str =
    "I couldn't find any relevant information to answer your question.";

/// Reply used when any pipeline stage fails. Deliberately carries no
/// detail about which stage failed; the log does.
pub const PIPELINE_ERROR_MESSAGE: &str = "An error occurred while processing your query.";

/// Name used in prompts when the caller does not provide one
pub const DEFAULT_USER_NAME: &str = "User";
