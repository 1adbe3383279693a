//! Provider configuration from TOML (`[providers]` section)
//!
//! Every supported family speaks the OpenAI chat-completions protocol; each
//! gets its own endpoint block.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEndpointConfig {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Default max tokens per response.
    pub max_tokens: Option<u32>,
    /// Model alias → provider model id, for aliases the API names differently.
    pub model_ids: BTreeMap<String, String>,
}

impl FileEndpointConfig {
    fn new(api_key_env: &str, base_url: &str) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            api_key: None,
            base_url: base_url.to_string(),
            max_tokens: None,
            model_ids: BTreeMap::new(),
        }
    }

    /// API key from the config, or from the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }
}

impl Default for FileEndpointConfig {
    fn default() -> Self {
        Self::new("OPENAI_API_KEY", "https://api.openai.com/v1")
    }
}

fn anthropic_default() -> FileEndpointConfig {
    let mut config = FileEndpointConfig::new("ANTHROPIC_API_KEY", "https://api.anthropic.com/v1");
    config.model_ids = BTreeMap::from([
        ("claude-4.5-haiku".to_string(), "claude-haiku-4-5".to_string()),
        ("claude-4.5-sonnet".to_string(), "claude-sonnet-4-5".to_string()),
        ("claude-4.5-opus".to_string(), "claude-opus-4-5".to_string()),
    ]);
    config
}

fn gemini_default() -> FileEndpointConfig {
    FileEndpointConfig::new(
        "GEMINI_API_KEY",
        "https://generativelanguage.googleapis.com/v1beta/openai",
    )
}

fn perplexity_default() -> FileEndpointConfig {
    let mut config = FileEndpointConfig::new("PERPLEXITY_API_KEY", "https://api.perplexity.ai");
    config.model_ids = BTreeMap::from([
        ("pplx-70b-online".to_string(), "sonar-pro".to_string()),
        ("pplx-online-mini".to_string(), "sonar".to_string()),
    ]);
    config
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Default provider for models no family claims:
    /// "openai", "anthropic", "gemini", "perplexity".
    pub default: Option<String>,
    pub openai: FileEndpointConfig,
    pub anthropic: FileEndpointConfig,
    pub gemini: FileEndpointConfig,
    pub perplexity: FileEndpointConfig,
    /// Explicit model → provider routing overrides.
    pub routing: HashMap<String, String>,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            default: None,
            openai: FileEndpointConfig::default(),
            anthropic: anthropic_default(),
            gemini: gemini_default(),
            perplexity: perplexity_default(),
            routing: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileProvidersConfig::default();
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.perplexity.base_url, "https://api.perplexity.ai");
        assert_eq!(
            config.anthropic.model_ids.get("claude-4.5-haiku").map(String::as_str),
            Some("claude-haiku-4-5")
        );
    }

    #[test]
    fn test_direct_key_wins() {
        let mut config = FileEndpointConfig::default();
        config.api_key_env = "DRAFTSMITH_TEST_UNSET_KEY".to_string();
        assert_eq!(config.resolve_api_key(), None);
        config.api_key = Some("sk-test".to_string());
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_deserialize_partial() {
        let toml_str = r#"
default = "anthropic"

[openai]
base_url = "http://localhost:8080/v1"

[routing]
"gpt-5" = "anthropic"
"#;
        let config: FileProvidersConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default.as_deref(), Some("anthropic"));
        assert_eq!(config.openai.base_url, "http://localhost:8080/v1");
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.routing.get("gpt-5").map(String::as_str), Some("anthropic"));
    }
}
