//! Tier value object: a quality/cost class of model candidates

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Named quality/cost class with its own fixed fallback order.
///
/// - `Light`: simple work (summaries, classification, planning)
/// - `Standard`: general writing and comparison
/// - `Premium`: complex reasoning and structuring
/// - `Search`: online (web-grounded) models
/// - `Embedding`: vector embeddings, single candidate only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Light,
    Standard,
    Premium,
    Search,
    Embedding,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Light,
        Tier::Standard,
        Tier::Premium,
        Tier::Search,
        Tier::Embedding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Light => "light",
            Tier::Standard => "standard",
            Tier::Premium => "premium",
            Tier::Search => "search",
            Tier::Embedding => "embedding",
        }
    }

    /// Embedding tiers cannot fall back: vector spaces of different models
    /// are incompatible.
    pub fn allows_fallback(&self) -> bool {
        !matches!(self, Tier::Embedding)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Tier::Light),
            "standard" => Ok(Tier::Standard),
            "premium" => Ok(Tier::Premium),
            "search" => Ok(Tier::Search),
            "embedding" => Ok(Tier::Embedding),
            other => Err(DomainError::UnknownTier(other.to_string())),
        }
    }
}
