//! Fallback table: the ordered candidate models of each tier.

use draftsmith_domain::{Model, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackTableError {
    #[error("Tier '{0}' has no candidate models")]
    EmptyTier(Tier),

    #[error("Tier '{tier}' cannot fall back but lists {count} candidates")]
    FallbackNotAllowed { tier: Tier, count: usize },

    #[error("Model '{model}' is listed twice in tier '{tier}'")]
    DuplicateCandidate { tier: Tier, model: Model },
}

/// Static, read-only mapping of tier to ordered candidates.
///
/// Constructed once at startup and shared across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackTable {
    tiers: BTreeMap<Tier, Vec<Model>>,
}

impl Default for FallbackTable {
    fn default() -> Self {
        let tiers = BTreeMap::from([
            (
                Tier::Light,
                vec![Model::ClaudeHaiku45, Model::Gpt41Mini, Model::Gemini20Flash],
            ),
            (
                Tier::Standard,
                vec![Model::Gpt5Mini, Model::Gpt41, Model::ClaudeSonnet45],
            ),
            (Tier::Premium, vec![Model::Gpt5, Model::ClaudeOpus45]),
            (
                Tier::Search,
                vec![Model::Pplx70bOnline, Model::PplxOnlineMini],
            ),
            (Tier::Embedding, vec![Model::TextEmbedding3Large]),
        ]);
        Self { tiers }
    }
}

impl FallbackTable {
    /// Build a table, checking that every tier has candidates, that no tier
    /// lists a model twice, and that non-fallback tiers hold exactly one.
    pub fn new(tiers: BTreeMap<Tier, Vec<Model>>) -> Result<Self, FallbackTableError> {
        for tier in Tier::ALL {
            let candidates = tiers.get(&tier).map(Vec::as_slice).unwrap_or_default();
            if candidates.is_empty() {
                return Err(FallbackTableError::EmptyTier(tier));
            }
            if !tier.allows_fallback() && candidates.len() > 1 {
                return Err(FallbackTableError::FallbackNotAllowed {
                    tier,
                    count: candidates.len(),
                });
            }
            for (i, model) in candidates.iter().enumerate() {
                if candidates[..i].contains(model) {
                    return Err(FallbackTableError::DuplicateCandidate {
                        tier,
                        model: model.clone(),
                    });
                }
            }
        }
        Ok(Self { tiers })
    }

    /// Default table with some tiers replaced.
    pub fn with_overrides(
        overrides: BTreeMap<Tier, Vec<Model>>,
    ) -> Result<Self, FallbackTableError> {
        let mut tiers = Self::default().tiers;
        tiers.extend(overrides);
        Self::new(tiers)
    }

    pub fn candidates(&self, tier: Tier) -> &[Model] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or_default()
    }

    /// Candidates in attempt order, with `preferred` moved to the front.
    ///
    /// A preferred model that is not in the tier is tried first and the
    /// tier's own list follows. The list never repeats a model.
    pub fn attempt_order(&self, tier: Tier, preferred: Option<&Model>) -> Vec<Model> {
        let candidates = self.candidates(tier);
        let Some(preferred) = preferred else {
            return candidates.to_vec();
        };
        if !tier.allows_fallback() {
            return candidates.to_vec();
        }
        let mut order = Vec::with_capacity(candidates.len() + 1);
        order.push(preferred.clone());
        order.extend(candidates.iter().filter(|m| *m != preferred).cloned());
        order
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[Model])> {
        self.tiers.iter().map(|(tier, models)| (*tier, models.as_slice()))
    }
}

/// Caller-chosen model per tier, tried before the tier's table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPreferences {
    preferred: BTreeMap<Tier, Model>,
}

impl ModelPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tier: Tier, model: Model) -> Self {
        self.preferred.insert(tier, model);
        self
    }

    pub fn get(&self, tier: Tier) -> Option<&Model> {
        self.preferred.get(&tier)
    }

    pub fn is_empty(&self) -> bool {
        self.preferred.is_empty()
    }
}
