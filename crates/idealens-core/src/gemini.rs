//! Gemini generateContent client.
//!
//! Sends a prompt with JSON-constrained generation settings to the
//! configured model endpoint and returns the generated text plus the
//! finish reason.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::analysis::model::response_schema;
use crate::error::{IdeaLensError, IdeaLensResult};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Upper bound on one generateContent round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Upstream configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    /// Read `GEMINI_API_KEY` (required) and `GEMINI_MODEL` (optional).
    pub fn from_env() -> IdeaLensResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .unwrap_or_default()
            .trim()
            .to_string();
        if api_key.is_empty() {
            return Err(IdeaLensError::MissingApiKey);
        }

        let model = std::env::var("GEMINI_MODEL")
            .unwrap_or_default()
            .trim()
            .to_string();
        let model = if model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model
        };

        Ok(Self { api_key, model })
    }
}

/// Generation parameters for one attempt.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Text payload and finish reason returned by one call.
#[derive(Debug, Clone)]
pub struct RawModelOutput {
    pub text: String,
    /// Why generation stopped; empty when the API omitted it.
    pub finish_reason: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: String,
    response_json_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseCandidate {
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: String,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Client for the Gemini generateContent endpoint.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from `GEMINI_API_KEY`/`GEMINI_MODEL`.
    pub fn from_env() -> IdeaLensResult<Self> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Issue one generateContent call.
    pub async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> IdeaLensResult<RawModelOutput> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
                response_mime_type: "application/json".to_string(),
                response_json_schema: response_schema(),
            },
        };

        let url = format!("{}/{}:generateContent", GEMINI_API_URL, self.config.model);
        debug!(model = %self.config.model, temperature = params.temperature, "Calling Gemini API");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdeaLensError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| IdeaLensError::MalformedResponse(e.to_string()))?;

        let candidate = body.candidates.into_iter().next().ok_or_else(|| {
            IdeaLensError::MalformedResponse("no candidates in response".to_string())
        })?;
        let finish_reason = candidate.finish_reason;
        let text = candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                IdeaLensError::MalformedResponse("candidate has no text part".to_string())
            })?;

        debug!(finish_reason = %finish_reason, chars = text.len(), "Gemini responded");
        Ok(RawModelOutput {
            text,
            finish_reason,
        })
    }
}
