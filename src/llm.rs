use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Upper bound on how much extracted text goes into a prompt, in characters.
pub const MAX_EXCERPT_CHARS: usize = 15000;

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Returns at most the first `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

pub fn build_prompt(text: &str) -> String {
    let excerpt = excerpt(text, MAX_EXCERPT_CHARS);
    let mut result = String::with_capacity(excerpt.len() + 256);
    result.push_str("Act as an academic expert.\n");
    result.push_str("Summarize the following text into 3-5 concise, high-value bullet points suitable for quick revision.\n");
    result.push_str("Focus on key concepts, definitions, and formulas.\n\n");
    result.push_str("Text:\n");
    result.push_str(excerpt);
    result
}

/// Builds the prompt for `text`, sends it once, and trims the reply.
pub async fn summarize(generator: &dyn SummaryGenerator, text: &str) -> Result<String> {
    let prompt = build_prompt(text);
    debug!(prompt_chars = prompt.chars().count(), "Built prompt");

    let summary = generator.generate(&prompt).await?;
    Ok(summary.trim().to_string())
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.generation_timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GeminiClient {
            client,
            api_base: config.gemini_api_base.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl SummaryGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let mut request = self.client.post(self.endpoint()).json(&body);

        // Without a key the request still goes out; Gemini rejects it and the
        // rejection is reported like any other API failure.
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let res = request
            .send()
            .await
            .map_err(|e| AppError::GenerationError(format!("Gemini request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let detail = match res.text().await {
                Ok(raw) => serde_json::from_str::<ApiErrorEnvelope>(&raw)
                    .map(|envelope| envelope.error.message)
                    .unwrap_or(raw),
                Err(e) => format!("(failed to read error body: {})", e),
            };
            return Err(AppError::GenerationError(format!(
                "Gemini API returned {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateContentResponse = res.json().await.map_err(|e| {
            AppError::GenerationError(format!("Invalid response format from Gemini: {}", e))
        })?;

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            let reason = parsed
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason);
            return Err(AppError::GenerationError(match reason {
                Some(reason) => format!("Gemini blocked the prompt: {}", reason),
                None => "Gemini returned no candidates".to_string(),
            }));
        };

        let texts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        // A candidate cut off by a safety filter or token limit can come back
        // with no text parts at all.
        if texts.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(AppError::GenerationError(format!(
                "Gemini returned no text (finish reason: {})",
                reason
            )));
        }

        Ok(texts.concat())
    }
}
