// Configuration structs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::providers::openai::{GROQ_BASE_URL, GROQ_DEFAULT_MODEL};

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted conversation and preferences
    pub data_dir: PathBuf,

    /// Optional JSON file overriding the built-in risk phrase lists
    pub risk_keywords_path: Option<PathBuf>,

    /// Hosted model settings
    pub model: ModelConfig,

    /// Remote persistence mirror (disabled when absent)
    pub mirror: Option<MirrorConfig>,

    /// Narration backend
    pub narration: NarrationConfig,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            risk_keywords_path: None,
            model: ModelConfig::default(),
            mirror: None,
            narration: NarrationConfig::default(),
        }
    }

    /// Default data directory: ~/.otravoce
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".otravoce"))
            .unwrap_or_else(|| PathBuf::from(".otravoce"))
    }

    /// Path of the TOML config file inside the default data directory
    pub fn default_config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::default_data_dir())
    }
}

/// Hosted chat-completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider type: "groq", "openai" or "custom" (requires base_url)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Bearer credential
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override the provider's base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Request timeout; unset relies on the transport
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Number of previous non-crisis messages sent as context
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_model() -> String {
    GROQ_DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    600
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.8
}

fn default_history_limit() -> usize {
    12
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            base_url: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: None,
            history_limit: default_history_limit(),
        }
    }
}

impl ModelConfig {
    /// Base URL actually used for requests
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GROQ_BASE_URL)
    }
}

/// Hosted table that receives a copy of every user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Project URL, e.g. https://<project>.supabase.co
    pub url: String,

    /// Anonymous API key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "user_responses".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Whether a narrator is available at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Speech synthesis program (espeak-ng compatible flags)
    #[serde(default = "default_command")]
    pub command: String,
}

fn default_true() -> bool {
    true
}

fn default_command() -> String {
    "espeak-ng".to_string()
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_command(),
        }
    }
}
