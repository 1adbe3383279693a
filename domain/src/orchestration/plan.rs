//! Execution plan entities.
//!
//! An [`ExecutionPlan`] is an ordered list of [`PlanStage`]s, each holding one
//! or more [`AgentSpec`]s. Plans are validated on construction and immutable
//! afterwards; the only way to obtain one is through [`PlanBuilder`], which
//! numbers stages densely from 1.

use crate::agent::role::AgentRole;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of caller request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Planner-driven Q&A over the selected contents
    Ask,
    /// Fixed summarizer → writer drafting pipeline
    Draft,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Ask => "ask",
            RequestType::Draft => "draft",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which context sources the plan may draw on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    #[default]
    Auto,
    RagOnly,
    WebOnly,
    Both,
}

impl RetrievalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::Auto => "auto",
            RetrievalMode::RagOnly => "rag_only",
            RetrievalMode::WebOnly => "web_only",
            RetrievalMode::Both => "both",
        }
    }

    /// Whether selected contents may be used as a source.
    pub fn allows_contents(&self) -> bool {
        !matches!(self, RetrievalMode::WebOnly)
    }

    /// Whether web research may be used as a source.
    pub fn allows_web(&self) -> bool {
        !matches!(self, RetrievalMode::RagOnly)
    }
}

impl std::str::FromStr for RetrievalMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(RetrievalMode::Auto),
            "rag_only" => Ok(RetrievalMode::RagOnly),
            "web_only" => Ok(RetrievalMode::WebOnly),
            "both" => Ok(RetrievalMode::Both),
            other => Err(DomainError::UnknownRetrievalMode(other.to_string())),
        }
    }
}

/// One scheduled agent invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub agent_role: AgentRole,
    /// Why the agent was scheduled (diagnostic only)
    pub reason: String,
}

impl AgentSpec {
    pub fn new(agent_role: AgentRole, reason: impl Into<String>) -> Self {
        Self {
            agent_role,
            reason: reason.into(),
        }
    }
}

/// One step of an execution plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStage {
    stage_index: usize,
    parallel: bool,
    agents: Vec<AgentSpec>,
}

impl PlanStage {
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    /// `true` when the agents have no data dependency on each other and run
    /// concurrently.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }

    pub fn roles(&self) -> impl Iterator<Item = AgentRole> + '_ {
        self.agents.iter().map(|spec| spec.agent_role)
    }

    pub fn contains(&self, role: AgentRole) -> bool {
        self.roles().any(|r| r == role)
    }
}

/// Request-level facts recorded on the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub request_type: RequestType,
    pub retrieval_mode: RetrievalMode,
    pub selected_content_count: usize,
}

impl PlanMetadata {
    pub fn new(request_type: RequestType, retrieval_mode: RetrievalMode) -> Self {
        Self {
            request_type,
            retrieval_mode,
            selected_content_count: 0,
        }
    }

    pub fn with_selected_content_count(mut self, count: usize) -> Self {
        self.selected_content_count = count;
        self
    }
}

/// Immutable, validated execution plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    plan_id: String,
    stages: Vec<PlanStage>,
    metadata: PlanMetadata,
}

impl ExecutionPlan {
    pub fn builder(plan_id: impl Into<String>, metadata: PlanMetadata) -> PlanBuilder {
        PlanBuilder {
            plan_id: plan_id.into(),
            metadata,
            stages: Vec::new(),
        }
    }

    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }

    pub fn stages(&self) -> &[PlanStage] {
        &self.stages
    }

    pub fn metadata(&self) -> &PlanMetadata {
        &self.metadata
    }

    pub fn total_stages(&self) -> usize {
        self.stages.len()
    }

    /// Number of [`AgentSpec`]s across all stages.
    pub fn agent_count(&self) -> usize {
        self.stages.iter().map(|s| s.agents.len()).sum()
    }

    /// The writer-role agent of the last stage, if the plan has one.
    pub fn terminal_role(&self) -> Option<AgentRole> {
        self.stages
            .last()?
            .roles()
            .find(|role| role.is_terminal())
    }

    /// Check every structural invariant of a plan.
    ///
    /// - at least one stage, no empty stage
    /// - stage indices are `1..=n` in order
    /// - each role appears at most once (results and usage are keyed by role)
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.stages.is_empty() {
            return Err(DomainError::EmptyPlan);
        }

        let mut seen = BTreeSet::new();
        for (position, stage) in self.stages.iter().enumerate() {
            let expected = position + 1;
            if stage.stage_index != expected {
                return Err(DomainError::StageOutOfOrder {
                    expected,
                    found: stage.stage_index,
                });
            }
            if stage.agents.is_empty() {
                return Err(DomainError::EmptyStage(stage.stage_index));
            }
            for role in stage.roles() {
                if !seen.insert(role) {
                    return Err(DomainError::DuplicateAgent(role.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Builder that assigns dense, 1-based stage indices
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    plan_id: String,
    metadata: PlanMetadata,
    stages: Vec<PlanStage>,
}

impl PlanBuilder {
    /// Append a stage of concurrently running agents.
    ///
    /// A single-agent stage is recorded as sequential, since there is nothing
    /// to run alongside it.
    pub fn parallel_stage(self, agents: Vec<AgentSpec>) -> Self {
        let parallel = agents.len() > 1;
        self.push(parallel, agents)
    }

    /// Append a stage whose agents run one after another in order.
    pub fn sequential_stage(self, agents: Vec<AgentSpec>) -> Self {
        self.push(false, agents)
    }

    /// Shorthand for a stage holding exactly one agent.
    pub fn single(self, agent: AgentSpec) -> Self {
        self.push(false, vec![agent])
    }

    fn push(mut self, parallel: bool, agents: Vec<AgentSpec>) -> Self {
        let stage_index = self.stages.len() + 1;
        self.stages.push(PlanStage {
            stage_index,
            parallel,
            agents,
        });
        self
    }

    pub fn build(self) -> Result<ExecutionPlan, DomainError> {
        let plan = ExecutionPlan {
            plan_id: self.plan_id,
            stages: self.stages,
            metadata: self.metadata,
        };
        plan.validate()?;
        Ok(plan)
    }
}
