//! Tier candidate lists from TOML (`[tiers]` section)
//!
//! ```toml
//! [tiers]
//! light = ["gpt-4.1-mini", "claude-4.5-haiku"]
//! premium = ["claude-4.5-opus"]
//! ```
//!
//! Tiers not listed keep their built-in candidates.

use super::{ConfigIssue, Severity};
use draftsmith_application::FallbackTable;
use draftsmith_domain::{Model, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTiersConfig(pub BTreeMap<String, Vec<String>>);

impl FileTiersConfig {
    /// Build the fallback table, falling back to the built-in table when the
    /// overrides are invalid.
    pub fn to_fallback_table(&self) -> (FallbackTable, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut overrides = BTreeMap::new();

        for (name, models) in &self.0 {
            let tier = match name.parse::<Tier>() {
                Ok(tier) => tier,
                Err(_) => {
                    issues.push(ConfigIssue::new(
                        Severity::Warning,
                        format!("tiers.{name}: unknown tier, ignored"),
                    ));
                    continue;
                }
            };
            let parsed: Vec<Model> = models
                .iter()
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .map(Model::from)
                .collect();
            if parsed.len() != models.len() {
                issues.push(ConfigIssue::new(
                    Severity::Warning,
                    format!("tiers.{name}: empty model names ignored"),
                ));
            }
            overrides.insert(tier, parsed);
        }

        match FallbackTable::with_overrides(overrides) {
            Ok(table) => (table, issues),
            Err(e) => {
                issues.push(ConfigIssue::new(
                    Severity::Error,
                    format!("tiers: {e}; using built-in tiers"),
                ));
                (FallbackTable::default(), issues)
            }
        }
    }
}
