//! Configuration types for codechat.
//!
//! `AppConfig` represents the top-level `config.toml`. All fields have
//! sensible defaults so an empty (or missing) file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Whether conversation titles must be unique across the store.
///
/// The policy is configurable rather than hard-coded: duplicate titles are
/// allowed by default, and `Unique` makes `create_conversation` fail with
/// `StoreError::DuplicateTitle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePolicy {
    #[default]
    AllowDuplicates,
    Unique,
}

/// Top-level configuration, loaded from `~/.codechat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Title uniqueness policy for new conversations.
    #[serde(default)]
    pub title_policy: TitlePolicy,

    /// History window limits for prompt assembly.
    #[serde(default)]
    pub prompt: PromptLimits,

    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// SQLite connection tuning.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title_policy: TitlePolicy::default(),
            prompt: PromptLimits::default(),
            llm: LlmConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

/// SQLite connection tuning.
///
/// Writes always go through a single connection; only the read side fans
/// out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Size of the read pool.
    #[serde(default = "default_max_read_connections")]
    pub max_read_connections: u32,

    /// Seconds a connection waits on a locked database before giving up.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_max_read_connections() -> u32 {
    8
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_read_connections: default_max_read_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

/// Bounds on how much stored history is replayed into each prompt.
///
/// History grows without bound in the store; the prompt window does not.
/// Both knobs apply: the most-recent `max_history_messages` are taken, then
/// shrunk further from the oldest end until the estimated token count fits
/// `max_history_tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptLimits {
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,

    #[serde(default = "default_max_history_tokens")]
    pub max_history_tokens: u32,
}

fn default_max_history_messages() -> usize {
    40
}

fn default_max_history_tokens() -> u32 {
    6_000
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            max_history_messages: default_max_history_messages(),
            max_history_tokens: default_max_history_tokens(),
        }
    }
}

/// LLM provider settings.
///
/// The API key itself is never stored in the config file; `api_key_env`
/// names the environment variable to read it from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the generative language API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.title_policy, TitlePolicy::AllowDuplicates);
        assert_eq!(config.prompt.max_history_messages, 40);
        assert_eq!(config.prompt.max_history_tokens, 6_000);
        assert_eq!(config.llm.model, "gemini-pro");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.database.max_read_connections, 8);
        assert_eq!(config.database.busy_timeout_secs, 5);
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.title_policy, TitlePolicy::AllowDuplicates);
        assert_eq!(config.prompt.max_history_messages, 40);
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
title_policy = "unique"

[prompt]
max_history_messages = 12

[llm]
model = "gemini-1.5-flash"

[database]
max_read_connections = 2
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.title_policy, TitlePolicy::Unique);
        assert_eq!(config.prompt.max_history_messages, 12);
        // Unspecified fields keep their defaults
        assert_eq!(config.prompt.max_history_tokens, 6_000);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.database.max_read_connections, 2);
        assert_eq!(config.database.busy_timeout_secs, 5);
    }

    #[test]
    fn test_app_config_serde_roundtrip() {
        let config = AppConfig {
            title_policy: TitlePolicy::Unique,
            prompt: PromptLimits {
                max_history_messages: 8,
                max_history_tokens: 2_000,
            },
            llm: LlmConfig::default(),
            database: DatabaseConfig::default(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title_policy, TitlePolicy::Unique);
        assert_eq!(parsed.prompt.max_history_messages, 8);
    }
}
