//! OpenAI-compatible chat completions provider.
//!
//! Speaks the `/chat/completions` protocol, which covers the hosted OpenAI
//! API and self-hosted compatible servers (vLLM, llama.cpp, Ollama). The
//! endpoint is retargeted through `OPENAI_BASE_URL`; such servers commonly
//! ignore the Authorization header, so a placeholder credential is used when
//! no key is configured against a custom endpoint.
//!
//! ## Security
//!
//! The API key is stored using [`ApiCredential`] and only exposed at the
//! point the Authorization header is written.

use super::{
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable retargeting the API endpoint.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Hosted endpoint used when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Model used when neither flag nor environment names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI-compatible provider.
///
/// # Security
///
/// The API key is stored using [`ApiCredential`] which:
/// - Cannot be accidentally printed via `Debug` or `Display`
/// - Is zeroed on drop
/// - Must be explicitly exposed via `.expose()` when needed
pub struct OpenAiProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a new provider against the hosted endpoint.
    ///
    /// # Security
    ///
    /// The API key is immediately wrapped in an [`ApiCredential`] and cannot
    /// be accidentally logged or printed after construction.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::build(
            ApiCredential::new(api_key, CredentialSource::Programmatic, "OpenAI API key"),
            DEFAULT_API_BASE.to_string(),
        )
    }

    /// Create from the environment.
    ///
    /// Reads `OPENAI_API_KEY` and `OPENAI_BASE_URL`. A missing key is an
    /// error against the hosted endpoint; with an endpoint override the
    /// provider falls back to a placeholder credential.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_parts(
            std::env::var(OPENAI_API_KEY_ENV).ok(),
            std::env::var(OPENAI_BASE_URL_ENV).ok(),
        )
    }

    fn from_parts(api_key: Option<String>, base_url: Option<String>) -> Result<Self, ProviderError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let credential = match api_key {
            Some(key) => ApiCredential::new(key, CredentialSource::Environment, "OpenAI API key"),
            None if base_url != DEFAULT_API_BASE => ApiCredential::placeholder("OpenAI API key"),
            None => {
                return Err(ProviderError::NotConfigured(format!(
                    "OpenAI API key not set: configure '{}' environment variable",
                    OPENAI_API_KEY_ENV
                )))
            }
        };

        Ok(Self::build(credential, base_url))
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build(credential: ApiCredential, base_url: String) -> Self {
        tracing::debug!(
            credential = credential.name(),
            source = %credential.source(),
            base_url = %base_url,
            "provider configured"
        );
        Self {
            credential,
            base_url,
            // One client per provider; a run never outlives its provider, so
            // connections are not reused across runs.
            client: reqwest::Client::new(),
        }
    }
}

/// Chat completions request format.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            format_type: "json_object",
        }
    }
}

/// Chat completions response format.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    model: Option<String>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    error: ChatErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ChatErrorDetail {
    message: String,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatCompletionRequest {
            model: &config.model,
            messages: &messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            response_format: config.json_mode.then(ResponseFormat::json_object),
        };

        tracing::debug!(
            model = %config.model,
            json_mode = config.json_mode,
            "sending chat completion request"
        );

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        let status = response.status();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if !status.is_success() {
            // Error bodies are JSON from real servers but HTML from proxies;
            // fall back to the raw text so the status is never swallowed.
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ChatErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: body.model.unwrap_or_else(|| config.model.clone()),
            stop_reason: choice.finish_reason,
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
