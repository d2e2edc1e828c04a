//! Text generation module
//!
//! Sends fully-built prompts to a Gemini-compatible generation API and
//! returns the model's answer text verbatim.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::errors::Result;

/// Default generation model
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";

/// Anything that can turn a prompt into answer text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate an answer for the prompt. The returned text is the
    /// model's output as-is; callers decide how to present it.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
