//! Model value object representing an LLM model alias

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Model aliases known to the fallback tables (Value Object)
///
/// Aliases are provider-neutral names; the routing provider in the
/// infrastructure layer decides which endpoint serves each family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Model {
    // Claude models
    ClaudeHaiku45,
    ClaudeSonnet45,
    ClaudeOpus45,
    // GPT models
    Gpt41Mini,
    Gpt41,
    Gpt5Mini,
    Gpt5,
    // Gemini models
    Gemini20Flash,
    // Perplexity online models
    Pplx70bOnline,
    PplxOnlineMini,
    // Embedding models
    TextEmbedding3Large,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::ClaudeHaiku45 => "claude-4.5-haiku",
            Model::ClaudeSonnet45 => "claude-4.5-sonnet",
            Model::ClaudeOpus45 => "claude-4.5-opus",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt5Mini => "gpt-5-mini",
            Model::Gpt5 => "gpt-5",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Pplx70bOnline => "pplx-70b-online",
            Model::PplxOnlineMini => "pplx-online-mini",
            Model::TextEmbedding3Large => "text-embedding-3-large",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is a Claude model
    pub fn is_claude(&self) -> bool {
        matches!(
            self,
            Model::ClaudeHaiku45 | Model::ClaudeSonnet45 | Model::ClaudeOpus45
        )
    }

    /// Check if this is a GPT (or OpenAI embedding) model
    pub fn is_gpt(&self) -> bool {
        matches!(
            self,
            Model::Gpt41Mini
                | Model::Gpt41
                | Model::Gpt5Mini
                | Model::Gpt5
                | Model::TextEmbedding3Large
        )
    }

    /// Check if this is a Gemini model
    pub fn is_gemini(&self) -> bool {
        matches!(self, Model::Gemini20Flash)
    }

    /// Check if this is a Perplexity online (search) model
    pub fn is_perplexity(&self) -> bool {
        matches!(self, Model::Pplx70bOnline | Model::PplxOnlineMini)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "claude-4.5-haiku" => Model::ClaudeHaiku45,
            "claude-4.5-sonnet" => Model::ClaudeSonnet45,
            "claude-4.5-opus" => Model::ClaudeOpus45,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            "gpt-4.1" => Model::Gpt41,
            "gpt-5-mini" => Model::Gpt5Mini,
            "gpt-5" => Model::Gpt5,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "pplx-70b-online" => Model::Pplx70bOnline,
            "pplx-online-mini" => Model::PplxOnlineMini,
            "text-embedding-3-large" => Model::TextEmbedding3Large,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_aliases_parse_to_variants() {
        assert_eq!(Model::from("claude-4.5-haiku"), Model::ClaudeHaiku45);
        assert_eq!(Model::from("pplx-70b-online"), Model::Pplx70bOnline);
        assert_eq!(Model::from("gpt-5").to_string(), "gpt-5");
    }

    #[test]
    fn test_custom_model() {
        let model = Model::from("mistral-large");
        assert_eq!(model, Model::Custom("mistral-large".to_string()));
        assert_eq!(model.to_string(), "mistral-large");
    }

    #[test]
    fn test_model_family_detection() {
        assert!(Model::ClaudeSonnet45.is_claude());
        assert!(Model::Gpt41Mini.is_gpt());
        assert!(Model::Gemini20Flash.is_gemini());
        assert!(Model::PplxOnlineMini.is_perplexity());
        assert!(!Model::ClaudeSonnet45.is_gpt());
        assert!(!Model::Custom("x".into()).is_claude());
    }

    #[test]
    fn test_serde_uses_alias_string() {
        let json = serde_json::to_string(&Model::Gpt41).unwrap();
        assert_eq!(json, "\"gpt-4.1\"");
        let parsed: Model = serde_json::from_str("\"gemini-2.0-flash\"").unwrap();
        assert_eq!(parsed, Model::Gemini20Flash);
    }
}
