// Configuration loader
// Loads ~/.otravoce/config.toml, then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::{Config, MirrorConfig, ModelConfig, NarrationConfig};

/// Credential baked in at build time (`GROQ_API_KEY=... cargo build`)
const BUILD_TIME_API_KEY: Option<&str> = option_env!("GROQ_API_KEY");

/// Load configuration from the default config file and environment
pub fn load_config() -> Result<Config> {
    load_config_from(&Config::default_config_path())
}

/// Load configuration from a specific file (missing file = defaults)
pub fn load_config_from(path: &Path) -> Result<Config> {
    let mut config = match try_load_file(path)? {
        Some(config) => config,
        None => Config::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());

    if config.model.api_key.is_none() {
        if let Some(key) = BUILD_TIME_API_KEY.filter(|k| !k.is_empty()) {
            config.model.api_key = Some(key.to_string());
        }
    }

    Ok(config)
}

fn try_load_file(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_config(&contents).map(Some)
}

/// Parse TOML contents into a Config
pub fn parse_config(contents: &str) -> Result<Config> {
    // Parse TOML directly into a temp struct
    #[derive(serde::Deserialize)]
    struct TomlConfig {
        #[serde(default)]
        data_dir: Option<String>,
        #[serde(default)]
        risk_keywords_path: Option<String>,
        #[serde(default)]
        model: ModelConfig,
        #[serde(default)]
        mirror: Option<MirrorConfig>,
        #[serde(default)]
        narration: NarrationConfig,
    }

    let toml_config: TomlConfig = toml::from_str(contents)
        .map_err(|e| anyhow::anyhow!(crate::errors::config_parse_error(&e.to_string())))?;

    let data_dir = toml_config
        .data_dir
        .map(|d| expand_home(&d))
        .unwrap_or_else(Config::default_data_dir);

    let mut config = Config::new(data_dir);
    config.risk_keywords_path = toml_config.risk_keywords_path.map(|p| expand_home(&p));
    config.model = toml_config.model;
    config.mirror = toml_config.mirror;
    config.narration = toml_config.narration;

    Ok(config)
}

/// Apply environment overrides through `lookup`
pub fn apply_env<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty("OTRAVOCE_API_KEY").or_else(|| non_empty("GROQ_API_KEY")) {
        config.model.api_key = Some(key);
    }

    if let Some(model) = non_empty("OTRAVOCE_MODEL") {
        config.model.model = model;
    }

    if let Some(dir) = non_empty("OTRAVOCE_DATA_DIR") {
        config.data_dir = expand_home(&dir);
    }

    if let Some(url) = non_empty("SUPABASE_URL") {
        let api_key = non_empty("SUPABASE_ANON_KEY").unwrap_or_default();
        match config.mirror.as_mut() {
            Some(mirror) => {
                mirror.url = url;
                if !api_key.is_empty() {
                    mirror.api_key = api_key;
                }
            }
            None => {
                config.mirror = Some(MirrorConfig {
                    url,
                    api_key,
                    table: "user_responses".to_string(),
                });
            }
        }
    } else if let (Some(mirror), Some(api_key)) = (config.mirror.as_mut(), non_empty("SUPABASE_ANON_KEY")) {
        mirror.api_key = api_key;
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
