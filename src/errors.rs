// Error types and user-friendly error messages
//
// Provides helpers to convert technical errors into actionable messages
// that guide users toward solutions.
//
// Localization Support:
// The helper labels follow the LANG environment variable. Indonesian and
// English are supported, English is the fallback.

use anyhow::{Context, Result};
use std::fmt;

/// Errors the chat session reports to its caller
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from the local key/value store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored value for key '{key}' is corrupt: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Get the current locale from environment
fn get_locale() -> &'static str {
    if let Ok(lang) = std::env::var("LANG") {
        if lang.starts_with("id") || lang.starts_with("in") {
            return "id";
        }
    }
    "en"
}

/// Localized text helper
fn t(key: &str) -> String {
    let locale = get_locale();

    let text = match (locale, key) {
        ("en", "try") => "Try",
        ("en", "suggestion") => "Suggestion",
        ("en", "possible_causes") => "Possible causes",
        ("en", "error") => "Error",

        ("id", "try") => "Coba",
        ("id", "suggestion") => "Saran",
        ("id", "possible_causes") => "Kemungkinan penyebab",
        ("id", "error") => "Kesalahan",

        _ => match key {
            "try" => "Try",
            "suggestion" => "Suggestion",
            "possible_causes" => "Possible causes",
            "error" => "Error",
            _ => key,
        },
    };

    text.to_string()
}

/// Wrap an error with user-friendly context
pub trait UserFriendlyError {
    /// Add user-friendly context with a suggestion
    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self;
}

impl<T> UserFriendlyError for Result<T> {
    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self {
        self.with_context(|| {
            format!(
                "{}\n\n\x1b[1;33m{}:\x1b[0m {}",
                problem,
                t("suggestion"),
                suggestion
            )
        })
    }
}

/// Format a missing API key error with helpful suggestions
pub fn api_key_missing_error(provider: &str) -> String {
    format!(
        "{} API key is missing\n\n\
        \x1b[1;33m{}:\x1b[0m\n\
        • API key not set in config\n\
        • GROQ_API_KEY not exported in this shell\n\n\
        \x1b[1;32m{}:\x1b[0m\n\
        1. Export the key:\n\
           \x1b[36mexport GROQ_API_KEY=\"gsk_...\"\x1b[0m\n\n\
        2. Or add it to your config file:\n\
           \x1b[36m~/.otravoce/config.toml\x1b[0m\n\
           [model]\n\
           api_key = \"gsk_...\"\n\n\
        3. Get a key:\n\
           • Groq: https://console.groq.com/keys\n\
           • OpenAI: https://platform.openai.com/api-keys",
        provider,
        t("possible_causes"),
        t("try")
    )
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(error: &str) -> String {
    format!(
        "Failed to parse config file\n\n\
        \x1b[1;33m{}:\x1b[0m {}\n\n\
        \x1b[1;32m{}:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat ~/.otravoce/config.toml\x1b[0m\n\n\
        2. Backup and start from defaults:\n\
           \x1b[36mmv ~/.otravoce/config.toml ~/.otravoce/config.toml.backup\x1b[0m\n\n\
        3. Common mistakes:\n\
           • Missing quotes around strings\n\
           • Unclosed brackets []\n\
           • Numbers written as strings (temperature = \"0.7\")",
        t("error"),
        error,
        t("try")
    )
}

/// Format an unwritable data directory error
pub fn data_dir_error(path: &str) -> String {
    format!(
        "Cannot use data directory: {}\n\n\
        \x1b[1;33m{}:\x1b[0m\n\
        • Parent directory not writable\n\
        • Path exists but is a file\n\n\
        \x1b[1;32m{}:\x1b[0m\n\
        1. Check permissions:\n\
           \x1b[36mls -la {}\x1b[0m\n\n\
        2. Choose another directory:\n\
           \x1b[36motravoce --data-dir /path/to/dir\x1b[0m",
        path,
        t("possible_causes"),
        t("try"),
        path
    )
}

/// Wrap a generic error with suggestions
pub fn wrap_error_with_suggestion(error: impl fmt::Display, suggestion: &str) -> String {
    format!(
        "{}\n\n\
        \x1b[1;33m{}:\x1b[0m {}",
        error,
        t("suggestion"),
        suggestion
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_missing_has_setup_hints() {
        let msg = api_key_missing_error("groq");
        assert!(msg.contains("GROQ_API_KEY"));
        assert!(msg.contains("console.groq.com"));
    }

    #[test]
    fn test_config_parse_error_mentions_file() {
        let msg = config_parse_error("expected `]`");
        assert!(msg.contains("config.toml"));
        assert!(msg.contains("expected `]`"));
    }

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::from(StorageError::Io {
            path: "messages.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(
            err.to_string(),
            "storage error: failed to access messages.json: denied"
        );
    }

    #[test]
    fn test_user_context_with_suggestion() {
        let result: Result<()> = Err(anyhow::anyhow!("root cause"));
        let err = result
            .user_context_with_suggestion("Could not save", "check disk space")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("check disk space"));
    }
}
