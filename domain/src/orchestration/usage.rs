//! Token and cost accounting

use crate::agent::role::AgentRole;
use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage recorded for one agent that reached a terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentUsage {
    pub agent_role: AgentRole,
    pub model_used: Option<Model>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Cost in weighted token units (WTU)
    pub cost_units: u64,
}

impl AgentUsage {
    /// Usage of an agent that never got a response (skipped or failed).
    pub fn none(agent_role: AgentRole) -> Self {
        Self {
            agent_role,
            model_used: None,
            input_tokens: 0,
            output_tokens: 0,
            cost_units: 0,
        }
    }
}

/// Aggregate usage across a plan execution.
///
/// Totals are derived from `per_agent` on every [`record`](Self::record), so
/// they always equal the sum of the recorded entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    total_input_tokens: u64,
    total_output_tokens: u64,
    total_cost_units: u64,
    per_agent: BTreeMap<AgentRole, AgentUsage>,
}

impl UsageSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one agent's usage. A role can be recorded only once.
    pub fn record(&mut self, usage: AgentUsage) -> Result<(), DomainError> {
        if self.per_agent.contains_key(&usage.agent_role) {
            return Err(DomainError::DuplicateUsage(usage.agent_role.to_string()));
        }
        self.per_agent.insert(usage.agent_role, usage);
        self.recompute();
        Ok(())
    }

    /// Record a batch (one stage worth) of entries.
    pub fn record_all(
        &mut self,
        entries: impl IntoIterator<Item = AgentUsage>,
    ) -> Result<(), DomainError> {
        for usage in entries {
            self.record(usage)?;
        }
        Ok(())
    }

    fn recompute(&mut self) {
        self.total_input_tokens = self.per_agent.values().map(|u| u.input_tokens).sum();
        self.total_output_tokens = self.per_agent.values().map(|u| u.output_tokens).sum();
        self.total_cost_units = self.per_agent.values().map(|u| u.cost_units).sum();
    }

    pub fn total_input_tokens(&self) -> u64 {
        self.total_input_tokens
    }

    pub fn total_output_tokens(&self) -> u64 {
        self.total_output_tokens
    }

    pub fn total_cost_units(&self) -> u64 {
        self.total_cost_units
    }

    pub fn per_agent(&self) -> &BTreeMap<AgentRole, AgentUsage> {
        &self.per_agent
    }

    pub fn get(&self, role: AgentRole) -> Option<&AgentUsage> {
        self.per_agent.get(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(role: AgentRole, input: u64, output: u64, wtu: u64) -> AgentUsage {
        AgentUsage {
            agent_role: role,
            model_used: Some(Model::Gpt41),
            input_tokens: input,
            output_tokens: output,
            cost_units: wtu,
        }
    }

    #[test]
    fn test_totals_follow_entries() {
        let mut summary = UsageSummary::new();
        summary.record(usage(AgentRole::Summarizer, 100, 50, 1)).unwrap();
        assert_eq!(summary.total_input_tokens(), 100);
        summary.record(usage(AgentRole::Writer, 200, 80, 2)).unwrap();
        assert_eq!(summary.total_input_tokens(), 300);
        assert_eq!(summary.total_output_tokens(), 130);
        assert_eq!(summary.total_cost_units(), 3);
    }

    #[test]
    fn test_duplicate_role_is_not_counted_twice() {
        let mut summary = UsageSummary::new();
        summary.record(usage(AgentRole::Writer, 10, 10, 1)).unwrap();
        let err = summary.record(usage(AgentRole::Writer, 10, 10, 1)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateUsage("writer".to_string()));
        assert_eq!(summary.total_input_tokens(), 10);
    }

    #[test]
    fn test_skipped_agent_contributes_zero() {
        let mut summary = UsageSummary::new();
        summary.record(AgentUsage::none(AgentRole::Researcher)).unwrap();
        assert_eq!(summary.total_cost_units(), 0);
        assert!(summary.get(AgentRole::Researcher).is_some());
    }
}
