// Provider factory
//
// Creates LLM providers based on configuration

use anyhow::{bail, Result};
use std::time::Duration;

use super::openai::{OpenAIProvider, GROQ_BASE_URL, OPENAI_BASE_URL};
use super::LlmProvider;
use crate::config::ModelConfig;

/// Create a provider based on the model configuration
pub fn create_provider(config: &ModelConfig) -> Result<Box<dyn LlmProvider>> {
    let provider_name = config.provider.as_str();

    let api_key = match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => key.to_string(),
        None => bail!(crate::errors::api_key_missing_error(provider_name)),
    };

    let default_base = match provider_name {
        "groq" => GROQ_BASE_URL,
        "openai" => OPENAI_BASE_URL,
        "custom" => match config.base_url.as_deref() {
            Some(url) => url,
            None => bail!("Provider 'custom' requires model.base_url to be set"),
        },
        _ => bail!("Unknown provider: {}", provider_name),
    };

    let base_url = config.base_url.clone().unwrap_or_else(|| default_base.to_string());
    let timeout = config.timeout_secs.map(Duration::from_secs);

    let provider = OpenAIProvider::new(
        api_key,
        base_url,
        config.model.clone(),
        provider_name.to_string(),
        timeout,
    )?;

    Ok(Box::new(provider))
}
