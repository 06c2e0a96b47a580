// Hosted LLM provider support
//
// Abstraction over OpenAI-compatible chat-completion endpoints so the chat
// session can be driven by any of them (or by a fake in tests).

use anyhow::Result;
use async_trait::async_trait;

pub mod factory;
pub mod openai;
pub mod types;

pub use factory::create_provider;
pub use types::{ChatTurn, ProviderRequest, ProviderResponse, Role};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request and wait for the complete response
    ///
    /// Called once per user message; implementations must not retry.
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "groq", "openai")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
