//! Application layer for draftsmith
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod invocation;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use agents::AgentRunner;
pub use config::{ExecutionParams, FallbackTable, FallbackTableError, ModelPreferences};
pub use invocation::{AllProvidersFailed, CandidateFailure, ModelInvoker};
pub use ports::{
    content_store::{ContentStore, ContentStoreError, NoContentStore},
    event_sink::{BufferedEventSink, ChannelEventSink, EventSink, NoEvents, SinkClosed},
    model_provider::{ModelProvider, ProviderError},
    pricing::{CostCalculator, TokenCounter},
};
pub use use_cases::execute_plan::{ExecutePlanInput, ExecutePlanUseCase, ExecutorError};
pub use use_cases::run_orchestration::{
    ContentSource, OrchestrationRequest, OrchestratorError, RunOrchestrationUseCase,
};
