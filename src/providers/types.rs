// Request/response types for chat-completion providers
//
// Provider implementations translate these into their wire format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

/// One role-tagged turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Unified request format for all providers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    /// System turn first, then history, then the current user turn
    pub messages: Vec<ChatTurn>,

    /// Model name (empty = provider default)
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus-sampling threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Always false; responses are read in one piece
    pub stream: bool,
}

impl ProviderRequest {
    /// Create a new request from turns
    pub fn new(messages: Vec<ChatTurn>) -> Self {
        Self {
            messages,
            model: String::new(),
            max_tokens: 600,
            temperature: None,
            top_p: None,
            stream: false,
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set nucleus-sampling threshold
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }
}

/// Unified response format from providers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderResponse {
    /// Response ID (provider-specific)
    pub id: String,

    /// Model that generated the response
    pub model: String,

    /// Answer text; empty when the provider returned no content
    pub content: String,

    /// Why the model stopped generating
    pub finish_reason: Option<String>,

    /// Provider name (e.g., "groq", "openai")
    pub provider: String,
}

impl ProviderResponse {
    /// Answer text, `None` if blank
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(&self.content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::new(vec![ChatTurn::system("sys"), ChatTurn::user("hi")])
            .with_model("llama3-8b-8192")
            .with_max_tokens(600)
            .with_temperature(0.7)
            .with_top_p(0.8);

        assert_eq!(request.model, "llama3-8b-8192");
        assert_eq!(request.max_tokens, 600);
        assert!(!request.stream);
        assert_eq!(request.messages[1].role, Role::User);
    }

    #[test]
    fn test_turn_serialization() {
        let json = serde_json::to_value(ChatTurn::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "ok");
    }

    #[test]
    fn test_blank_response_has_no_text() {
        let response = ProviderResponse {
            id: "1".to_string(),
            model: "m".to_string(),
            content: "  \n".to_string(),
            finish_reason: None,
            provider: "groq".to_string(),
        };
        assert!(response.text().is_none());
    }
}
