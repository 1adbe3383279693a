//! Domain layer for draftsmith
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Execution Plan
//!
//! A request is answered by running an [`ExecutionPlan`]: ordered stages of
//! agents. Agents of a parallel stage run concurrently; stages run one after
//! another and each stage sees every output merged before it.
//!
//! ## Agents
//!
//! An [`AgentRole`] (planner, summarizer, analyzer, researcher, writer) calls
//! one model [`Tier`]. Every candidate of a tier is tried in order before the
//! agent gives up, and a tier never falls back to another tier.
//!
//! ## Usage
//!
//! Token counts and weighted token units (WTU) are recorded per agent in a
//! [`UsageSummary`] whose totals are always the sum of its entries.

pub mod agent;
pub mod content;
pub mod core;
pub mod llm;
pub mod orchestration;
pub mod prompt;
pub mod util;

// Re-export commonly used types
pub use agent::{
    behavior::AgentBehavior,
    output::{AgentOutput, extract_title},
    plan_parser::{PlannedAgent, PlannerDecision, parse_decision},
    role::AgentRole,
};
pub use content::entities::{Connection, SelectedContent, UsedContent};
pub use core::{error::DomainError, model::Model, tier::Tier};
pub use llm::{
    completion::{Completion, CompletionOptions, Invocation, TokenUsage},
    message::{Message, Role},
};
pub use orchestration::{
    context::{ContextView, OrchestrationContext, OrchestrationInput},
    event::{StatusLabel, StreamEvent},
    fragment::fragments,
    plan::{AgentSpec, ExecutionPlan, PlanMetadata, PlanStage, RequestType, RetrievalMode},
    response::{OrchestrationResponse, ResponseBody},
    result::{AgentResult, AgentStatus, AgentWarning, ExecutionResult, FinalOutput},
    state::PlanState,
    usage::{AgentUsage, UsageSummary},
};
pub use prompt::PromptTemplate;
