//! Gemini-compatible generation client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::FitRagError;
use crate::errors::Result;
use crate::llm::TextGenerator;

/// Client for the `:generateContent` endpoint of a Gemini-compatible API
#[derive(Debug)]
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    client: Client,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Pull the answer text out of a generation response. The first
/// candidate's parts are concatenated in order, untouched.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| FitRagError::Generation("No candidates in response".to_string()))?;

    if candidate.content.parts.is_empty() {
        return Err(FitRagError::Generation(
            "Candidate has no content parts".to_string(),
        ));
    }

    Ok(candidate
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .concat())
}

impl GeminiClient {
    /// Create a new generation client from configuration
    ///
    /// # Errors
    /// - Missing API key
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.llm_api_key().is_empty() {
            return Err(FitRagError::Config(
                "LLM API key not configured (set GEMINI_API_KEY or [llm].api_key)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| FitRagError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: config.llm_endpoint().to_string(),
            api_key: config.llm_api_key().to_string(),
            model: config.llm_model().to_string(),
            temperature: config.llm_temperature(),
            max_output_tokens: config.llm_max_output_tokens(),
            client,
        })
    }

    /// Model this client generates with
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    /// Generate answer text for a prompt
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, auth failures)
    /// - Invalid API responses (no candidates, empty content)
    async fn generate(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            contents: Vec<Content<'a>>,
            #[serde(
                rename = "generationConfig",
                skip_serializing_if = "Option::is_none"
            )]
            generation_config: Option<GenerationConfig>,
        }

        #[derive(Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }

        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct GenerationConfig {
            #[serde(skip_serializing_if = "Option::is_none")]
            temperature: Option<f32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            max_output_tokens: Option<u32>,
        }

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        debug!("Calling generation API: {}", url);

        let generation_config =
            if self.temperature.is_some() || self.max_output_tokens.is_some() {
                Some(GenerationConfig {
                    temperature: self.temperature,
                    max_output_tokens: self.max_output_tokens,
                })
            } else {
                None
            };

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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
            return Err(FitRagError::Generation(format!(
                "Generation API error ({status}): {error_text}"
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| FitRagError::Generation(format!("Failed to parse response: {e}")))?;

        extract_text(result)
    }
}
