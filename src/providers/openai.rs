// OpenAI-compatible chat-completions provider
//
// Works for Groq (the default hosted endpoint) and OpenAI, which share the
// same API format. One request per call: no retry, no streaming.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{ChatTurn, ProviderRequest, ProviderResponse};
use super::LlmProvider;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai";
pub const GROQ_DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-compatible API provider
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    provider_name: String,
}

impl OpenAIProvider {
    /// Create a provider with custom settings
    ///
    /// Without `timeout` the request relies on the transport's own timeouts.
    pub fn new(
        api_key: String,
        base_url: String,
        default_model: String,
        provider_name: String,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
            provider_name,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Convert ProviderRequest to OpenAI API format
    fn to_openai_request<'a>(&self, request: &'a ProviderRequest) -> OpenAIRequest<'a> {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        OpenAIRequest {
            model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stream: false,
        }
    }

    /// Convert OpenAI response to ProviderResponse
    fn from_openai_response(&self, response: OpenAIResponse) -> ProviderResponse {
        let (content, finish_reason) = match response.choices.into_iter().next() {
            Some(choice) => (choice.message.content.unwrap_or_default(), choice.finish_reason),
            None => (String::new(), None),
        };

        ProviderResponse {
            id: response.id,
            model: response.model,
            content,
            finish_reason,
            provider: self.provider_name.clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let openai_request = self.to_openai_request(request);

        tracing::debug!(
            "Sending request to {} ({} turns, model {})",
            self.provider_name,
            openai_request.messages.len(),
            openai_request.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {} API", self.provider_name))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "{} API request failed\n\nStatus: {}\nBody: {}",
                self.provider_name,
                status,
                error_body
            );
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} API response", self.provider_name))?;

        tracing::debug!("Received response {} from {}", openai_response.id, openai_response.model);

        Ok(self.from_openai_response(openai_response))
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// OpenAI API types

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest<'a> {
    model: String,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}
