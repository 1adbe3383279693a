//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types on
//! demand.

mod execution;
mod output;
mod pricing;
mod providers;
mod tiers;

pub use execution::FileExecutionConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use pricing::{FileModelWeight, FilePricingConfig};
pub use providers::{FileEndpointConfig, FileProvidersConfig};
pub use tiers::FileTiersConfig;

use serde::{Deserialize, Serialize};

/// How serious a configuration problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The value is ignored or replaced by a default
    Warning,
    /// A whole section falls back to its defaults
    Error,
}

/// A problem found while validating the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Candidate models per tier
    pub tiers: FileTiersConfig,
    /// Call timeout and channel sizing
    pub execution: FileExecutionConfig,
    /// OpenAI-compatible endpoints and model routing
    pub providers: FileProvidersConfig,
    /// WTU weights
    pub pricing: FilePricingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Tier tables
        issues.extend(self.tiers.to_fallback_table().1);

        // 2. Pricing weights
        let weights = std::iter::once((
            "default",
            self.pricing.default_input_weight,
            self.pricing.default_output_weight,
        ))
        .chain(
            self.pricing
                .models
                .iter()
                .map(|(model, w)| (model.as_str(), w.input, w.output)),
        );
        for (name, input, output) in weights {
            if !(input.is_finite() && output.is_finite()) || input < 0.0 || output < 0.0 {
                issues.push(ConfigIssue::new(
                    Severity::Warning,
                    format!("pricing.{name}: weights must be non-negative numbers, using 1.0"),
                ));
            }
        }

        // 3. Routing targets
        let known = ["openai", "anthropic", "gemini", "perplexity"];
        let targets = self
            .providers
            .routing
            .iter()
            .map(|(model, provider)| (format!("providers.routing.\"{model}\""), provider))
            .chain(
                self.providers
                    .default
                    .iter()
                    .map(|provider| ("providers.default".to_string(), provider)),
            );
        for (field, provider) in targets {
            if !known.contains(&provider.to_lowercase().as_str()) {
                issues.push(ConfigIssue::new(
                    Severity::Warning,
                    format!("{field}: unknown provider '{provider}', ignored"),
                ));
            }
        }

        issues
    }
}
