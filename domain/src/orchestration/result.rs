//! Agent and execution results

use super::plan::RequestType;
use super::usage::{AgentUsage, UsageSummary};
use crate::agent::output::AgentOutput;
use crate::agent::role::AgentRole;
use crate::content::entities::UsedContent;
use serde::{Deserialize, Serialize};

/// Terminal status of one agent invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Success,
    /// The agent raised an error other than provider exhaustion
    Failed,
    /// Every candidate of the agent's tier failed
    Skipped,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Success => "success",
            AgentStatus::Failed => "failed",
            AgentStatus::Skipped => "skipped",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentStatus::Success)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal problem attached to the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentWarning {
    pub agent: AgentRole,
    pub message: String,
}

impl AgentWarning {
    pub fn new(agent: AgentRole, message: impl Into<String>) -> Self {
        Self {
            agent,
            message: message.into(),
        }
    }
}

/// Outcome of one AgentSpec (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_role: AgentRole,
    pub status: AgentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<AgentOutput>,
    pub usage: AgentUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl AgentResult {
    pub fn success(content: String, output: AgentOutput, usage: AgentUsage) -> Self {
        Self {
            agent_role: usage.agent_role,
            status: AgentStatus::Success,
            content: Some(content),
            output: Some(output),
            usage,
            warning: None,
        }
    }

    pub fn skipped(agent_role: AgentRole) -> Self {
        Self::unsuccessful(
            agent_role,
            AgentStatus::Skipped,
            format!("{agent_role} skipped: no provider available"),
        )
    }

    pub fn failed(agent_role: AgentRole, message: impl Into<String>) -> Self {
        Self::unsuccessful(agent_role, AgentStatus::Failed, message.into())
    }

    fn unsuccessful(agent_role: AgentRole, status: AgentStatus, warning: String) -> Self {
        Self {
            agent_role,
            status,
            content: None,
            output: None,
            usage: AgentUsage::none(agent_role),
            warning: Some(warning),
        }
    }

    /// Attach the usage of a call that was made but did not succeed.
    pub fn with_usage(mut self, usage: AgentUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Caller-visible document produced by the terminal writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalOutput {
    pub title: String,
    pub body: String,
}

/// Everything a plan execution produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub plan_id: String,
    pub request_type: RequestType,
    /// `Some` only when the terminal writer succeeded
    pub final_output: Option<FinalOutput>,
    /// One entry per AgentSpec, in plan order
    pub results: Vec<AgentResult>,
    pub usage: UsageSummary,
    pub warnings: Vec<AgentWarning>,
    /// Roles of every AgentSpec, in plan order
    pub agents_used: Vec<AgentRole>,
    pub used_contents: Vec<UsedContent>,
}

impl ExecutionResult {
    pub fn result_for(&self, role: AgentRole) -> Option<&AgentResult> {
        self.results.iter().find(|r| r.agent_role == role)
    }

    pub fn succeeded(&self) -> bool {
        self.final_output.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_result_warning() {
        let result = AgentResult::skipped(AgentRole::Researcher);
        assert_eq!(result.status, AgentStatus::Skipped);
        assert_eq!(
            result.warning.as_deref(),
            Some("researcher skipped: no provider available")
        );
        assert_eq!(result.usage.cost_units, 0);
        assert!(result.content.is_none());
    }

    #[test]
    fn test_success_takes_role_from_usage() {
        let usage = AgentUsage {
            agent_role: AgentRole::Summarizer,
            model_used: None,
            input_tokens: 1,
            output_tokens: 1,
            cost_units: 1,
        };
        let result = AgentResult::success("s".into(), AgentOutput::text("s"), usage);
        assert_eq!(result.agent_role, AgentRole::Summarizer);
        assert!(result.is_success());
    }
}
