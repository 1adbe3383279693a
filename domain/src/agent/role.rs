//! Agent roles

use crate::core::error::DomainError;
use crate::core::tier::Tier;
use serde::{Deserialize, Serialize};

/// Closed set of agent roles an execution plan can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Planner,
    Summarizer,
    Analyzer,
    Researcher,
    Writer,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Planner => "planner",
            AgentRole::Summarizer => "summarizer",
            AgentRole::Analyzer => "analyzer",
            AgentRole::Researcher => "researcher",
            AgentRole::Writer => "writer",
        }
    }

    /// Tier each role invokes.
    pub fn tier(&self) -> Tier {
        match self {
            AgentRole::Planner | AgentRole::Summarizer => Tier::Light,
            AgentRole::Analyzer => Tier::Premium,
            AgentRole::Researcher => Tier::Search,
            AgentRole::Writer => Tier::Standard,
        }
    }

    /// Sampling temperature for the role.
    pub fn temperature(&self) -> f32 {
        match self {
            AgentRole::Planner => 0.2,
            AgentRole::Summarizer => 0.3,
            AgentRole::Analyzer => 0.4,
            AgentRole::Researcher => 0.5,
            AgentRole::Writer => 0.7,
        }
    }

    /// Whether this role produces the caller-visible final output.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentRole::Writer)
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planner" => Ok(AgentRole::Planner),
            "summarizer" => Ok(AgentRole::Summarizer),
            "analyzer" => Ok(AgentRole::Analyzer),
            "researcher" => Ok(AgentRole::Researcher),
            "writer" => Ok(AgentRole::Writer),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tiers() {
        assert_eq!(AgentRole::Summarizer.tier(), Tier::Light);
        assert_eq!(AgentRole::Writer.tier(), Tier::Standard);
        assert_eq!(AgentRole::Researcher.tier(), Tier::Search);
        assert_eq!(AgentRole::Analyzer.tier(), Tier::Premium);
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(" Writer ".parse::<AgentRole>().unwrap(), AgentRole::Writer);
        assert!("critic".parse::<AgentRole>().is_err());
    }

    #[test]
    fn test_only_writer_is_terminal() {
        assert!(AgentRole::Writer.is_terminal());
        assert!(!AgentRole::Summarizer.is_terminal());
    }
}
