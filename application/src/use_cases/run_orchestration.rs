//! Run Orchestration use case
//!
//! Entry point for `ask` and `draft` requests: resolves the selected
//! contents, builds the plan (fixed for `draft`, planner-driven for `ask`),
//! runs it and shapes the response.

use super::execute_plan::{Emitter, ExecutePlanInput, ExecutePlanUseCase, ExecutorError};
use crate::agents::{AgentRunner, Planner, draft_plan};
use crate::config::ModelPreferences;
use crate::invocation::ModelInvoker;
use crate::ports::content_store::{ContentStore, ContentStoreError};
use crate::ports::event_sink::{EventSink, NoEvents};
use crate::ports::model_provider::ModelProvider;
use crate::ports::pricing::CostCalculator;
use draftsmith_domain::{
    AgentRole, AgentWarning, Connection, DomainError, ExecutionPlan, ExecutionResult,
    OrchestrationContext, OrchestrationInput, OrchestrationResponse, PlanMetadata, RequestType,
    RetrievalMode, SelectedContent, StreamEvent, UsageSummary, UsedContent,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during orchestration
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Content store error: {0}")]
    ContentStore(#[from] ContentStoreError),

    #[error("Plan error: {0}")]
    Plan(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutorError),
}

/// Where the request's contents come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Looked up through the [`ContentStore`]
    Ids(Vec<i64>),
    /// Carried by the request itself
    Inline(Vec<SelectedContent>),
}

impl Default for ContentSource {
    fn default() -> Self {
        ContentSource::Inline(Vec::new())
    }
}

/// Input for the RunOrchestration use case
#[derive(Debug, Clone)]
pub struct OrchestrationRequest {
    pub request_type: RequestType,
    pub prompt: String,
    pub contents: ContentSource,
    pub connections: Vec<Connection>,
    pub model_preferences: ModelPreferences,
    pub retrieval_mode: RetrievalMode,
}

impl OrchestrationRequest {
    pub fn new(request_type: RequestType, prompt: impl Into<String>) -> Self {
        Self {
            request_type,
            prompt: prompt.into(),
            contents: ContentSource::default(),
            connections: Vec::new(),
            model_preferences: ModelPreferences::default(),
            retrieval_mode: RetrievalMode::default(),
        }
    }

    pub fn ask(prompt: impl Into<String>) -> Self {
        Self::new(RequestType::Ask, prompt)
    }

    pub fn draft(prompt: impl Into<String>) -> Self {
        Self::new(RequestType::Draft, prompt)
    }

    pub fn with_contents(mut self, contents: ContentSource) -> Self {
        self.contents = contents;
        self
    }

    pub fn with_connections(mut self, connections: Vec<Connection>) -> Self {
        self.connections = connections;
        self
    }

    pub fn with_model_preferences(mut self, preferences: ModelPreferences) -> Self {
        self.model_preferences = preferences;
        self
    }

    pub fn with_retrieval_mode(mut self, mode: RetrievalMode) -> Self {
        self.retrieval_mode = mode;
        self
    }
}

/// Use case for answering an `ask` or `draft` request
pub struct RunOrchestrationUseCase<P: ModelProvider + 'static> {
    invoker: Arc<ModelInvoker<P>>,
    cost_calculator: Arc<dyn CostCalculator>,
    content_store: Arc<dyn ContentStore>,
}

impl<P: ModelProvider + 'static> RunOrchestrationUseCase<P> {
    pub fn new(
        invoker: Arc<ModelInvoker<P>>,
        cost_calculator: Arc<dyn CostCalculator>,
        content_store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            invoker,
            cost_calculator,
            content_store,
        }
    }

    /// Execute without streaming
    pub async fn run(
        &self,
        request: OrchestrationRequest,
    ) -> Result<OrchestrationResponse, OrchestratorError> {
        self.run_with_events(request, &NoEvents).await
    }

    /// Execute, writing every event to `sink`
    pub async fn run_with_events(
        &self,
        request: OrchestrationRequest,
        sink: &dyn EventSink,
    ) -> Result<OrchestrationResponse, OrchestratorError> {
        let result = self.execute(request, sink).await?;
        Ok(OrchestrationResponse::from(&result))
    }

    /// Execute and return the full execution result
    pub async fn execute(
        &self,
        request: OrchestrationRequest,
        sink: &dyn EventSink,
    ) -> Result<ExecutionResult, OrchestratorError> {
        let runner = AgentRunner::new(Arc::clone(&self.invoker), Arc::clone(&self.cost_calculator))
            .with_preferences(request.model_preferences.clone());

        let emitter = Emitter::new(sink);

        // Failures before the executor starts are reported here; the
        // executor reports its own.
        let prepared = match self.prepare(request, &runner, &emitter).await {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("Orchestration failed before execution: {}", e);
                emitter
                    .emit(StreamEvent::error("orchestration failed", Some(e.to_string())))
                    .await;
                return Err(e);
            }
        };

        let result = ExecutePlanUseCase::new(runner)
            .execute_with(prepared, &emitter)
            .await?;
        Ok(result)
    }

    async fn prepare(
        &self,
        request: OrchestrationRequest,
        runner: &AgentRunner<P>,
        emitter: &Emitter<'_>,
    ) -> Result<ExecutePlanInput, OrchestratorError> {
        if request.prompt.trim().is_empty() {
            return Err(OrchestratorError::EmptyPrompt);
        }

        let selected_contents = match request.contents {
            ContentSource::Inline(contents) => contents,
            ContentSource::Ids(ids) if ids.is_empty() => Vec::new(),
            ContentSource::Ids(ids) => self.content_store.get_contents_by_ids(&ids).await?,
        };
        let used_contents = self.used_contents(&selected_contents);

        let plan_id = format!("plan_{}", uuid::Uuid::new_v4().simple());
        let metadata = PlanMetadata::new(request.request_type, request.retrieval_mode)
            .with_selected_content_count(selected_contents.len());

        let mut context = OrchestrationContext::new(OrchestrationInput {
            request_id: format!("req_{}", uuid::Uuid::new_v4().simple()),
            prompt: request.prompt,
            request_type: request.request_type,
            retrieval_mode: request.retrieval_mode,
            selected_contents,
            connections: request.connections,
        });
        let mut usage = UsageSummary::new();

        let plan: ExecutionPlan = match request.request_type {
            RequestType::Draft => draft_plan(plan_id, metadata)?,
            RequestType::Ask => {
                emitter.emit(StreamEvent::planning()).await;
                let outcome = Planner::new(runner.clone())
                    .plan(plan_id, metadata, &context.view())
                    .await?;
                usage.record(outcome.planner_result.usage.clone())?;
                if let Some(message) = outcome.planner_result.warning.clone() {
                    context.push_warning(AgentWarning::new(AgentRole::Planner, message));
                }
                outcome.plan
            }
        };
        emitter.emit(StreamEvent::Plan(plan.clone())).await;

        info!(
            "Prepared {} plan {} over {} content(s)",
            plan.metadata().request_type,
            plan.plan_id(),
            plan.metadata().selected_content_count
        );

        Ok(ExecutePlanInput::new(plan, context)
            .with_usage(usage)
            .with_used_contents(used_contents))
    }

    /// Token count of the text each content hands to agents, measured
    /// against the writer tier's first candidate.
    fn used_contents(&self, contents: &[SelectedContent]) -> Vec<UsedContent> {
        let Some(model) = self.invoker.table().candidates(AgentRole::Writer.tier()).first() else {
            return Vec::new();
        };
        let counter = self.invoker.token_counter();
        contents
            .iter()
            .map(|content| UsedContent {
                content_id: content.content_id,
                tokens_used: counter.count_tokens(content.body(), model),
            })
            .collect()
    }
}
