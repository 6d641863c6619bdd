//! HTTP client for an OpenAI-compatible chat-completions API.
//!
//! Sends a single user message and returns the text of the first choice.
//! Non-2xx replies surface as [`GenerateError::Api`] carrying the provider's
//! own error message so callers can pass it through unchanged.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, GenerateError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Client for the chat-completions endpoint.
///
/// Use [`CompletionClient::new`] for the public API or
/// [`CompletionClient::with_base_url`] to point at a mock server in tests.
pub struct CompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl CompletionClient {
    /// Creates a client pointed at the public `OpenAI` API.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GenerateError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock or
    /// for another OpenAI-compatible provider).
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GenerateError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("phasee/0.1 (content-planner)")
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GenerateError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the first choice's message content.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::Http`] on network failure.
    /// - [`GenerateError::Api`] on a non-2xx status.
    /// - [`GenerateError::Decode`] if the envelope is malformed or carries no content.
    pub async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, GenerateError> {
        let url = self.completions_url()?;
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message: provider_error_message(&text)
                    .unwrap_or_else(|| format!("provider returned HTTP {status}")),
            });
        }

        let envelope: ChatResponse = serde_json::from_str(&text).map_err(DecodeError::from)?;
        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerateError::Decode(DecodeError::MissingContent))
    }

    fn completions_url(&self) -> Result<Url, GenerateError> {
        self.base_url
            .join("chat/completions")
            .map_err(|e| GenerateError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Pull `error.message` out of an OpenAI-style error body.
fn provider_error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}
