//! Execute Plan use case
//!
//! Runs an [`ExecutionPlan`] stage by stage. Agents of a parallel stage are
//! spawned together and joined behind a barrier; each writes its result into
//! its own pre-allocated slot. Agent failures never abort a run: only
//! structural problems (invalid plan, unfilled slot, illegal state) do.

use crate::agents::AgentRunner;
use crate::ports::event_sink::EventSink;
use crate::ports::model_provider::ModelProvider;
use draftsmith_domain::{
    AgentOutput, AgentResult, AgentRole, AgentWarning, ContextView, DomainError, ExecutionPlan,
    ExecutionResult, FinalOutput, OrchestrationContext, PlanStage, PlanState, StatusLabel,
    StreamEvent, UsageSummary, UsedContent, fragments,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Infrastructure errors that abort a run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Invalid plan: {0}")]
    InvalidPlan(DomainError),

    #[error("Stage {stage} finished without a result for {missing:?}")]
    IncompleteStage {
        stage: usize,
        missing: Vec<AgentRole>,
    },

    #[error("Illegal executor state: {0}")]
    IllegalState(DomainError),

    #[error("Usage accounting error: {0}")]
    Usage(DomainError),
}

/// Input for the ExecutePlan use case
pub struct ExecutePlanInput {
    pub plan: ExecutionPlan,
    pub context: OrchestrationContext,
    /// Usage recorded before the plan started (e.g. by the planner)
    pub usage: UsageSummary,
    pub used_contents: Vec<UsedContent>,
}

impl ExecutePlanInput {
    pub fn new(plan: ExecutionPlan, context: OrchestrationContext) -> Self {
        Self {
            plan,
            context,
            usage: UsageSummary::new(),
            used_contents: Vec::new(),
        }
    }

    pub fn with_usage(mut self, usage: UsageSummary) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_used_contents(mut self, used_contents: Vec<UsedContent>) -> Self {
        self.used_contents = used_contents;
        self
    }
}

/// Writes to the sink until it reports closure, then drops every later
/// event. The run itself carries on.
pub(crate) struct Emitter<'a> {
    sink: &'a dyn EventSink,
    closed: AtomicBool,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(sink: &'a dyn EventSink) -> Self {
        Self {
            sink,
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) async fn emit(&self, event: StreamEvent) {
        if self.closed.load(Ordering::Relaxed) {
            return;
        }
        let name = event.name();
        if self.sink.send(event).await.is_err() {
            info!("Event sink closed at '{}' event, continuing without events", name);
            self.closed.store(true, Ordering::Relaxed);
        }
    }
}

/// Use case for running an execution plan
pub struct ExecutePlanUseCase<P: ModelProvider + 'static> {
    runner: AgentRunner<P>,
}

impl<P: ModelProvider + 'static> ExecutePlanUseCase<P> {
    pub fn new(runner: AgentRunner<P>) -> Self {
        Self { runner }
    }

    /// Execute the plan, writing events to `sink`.
    ///
    /// On success the last event written is `done`; on error it is `error`.
    pub async fn execute(
        &self,
        input: ExecutePlanInput,
        sink: &dyn EventSink,
    ) -> Result<ExecutionResult, ExecutorError> {
        self.execute_with(input, &Emitter::new(sink)).await
    }

    /// Same as [`Self::execute`], continuing on an emitter the caller
    /// has already written to.
    pub(crate) async fn execute_with(
        &self,
        input: ExecutePlanInput,
        emitter: &Emitter<'_>,
    ) -> Result<ExecutionResult, ExecutorError> {
        match self.run(input, emitter).await {
            Ok(result) => {
                let text = result
                    .final_output
                    .as_ref()
                    .map(|output| output.body.clone())
                    .unwrap_or_default();
                for fragment in fragments(&text) {
                    emitter
                        .emit(StreamEvent::Chunk {
                            text: fragment.to_string(),
                        })
                        .await;
                }
                emitter.emit(StreamEvent::Done(Box::new(result.clone()))).await;
                Ok(result)
            }
            Err(e) => {
                warn!("Plan execution failed: {}", e);
                emitter
                    .emit(StreamEvent::error("plan execution failed", Some(e.to_string())))
                    .await;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        input: ExecutePlanInput,
        emitter: &Emitter<'_>,
    ) -> Result<ExecutionResult, ExecutorError> {
        let ExecutePlanInput {
            plan,
            mut context,
            mut usage,
            used_contents,
        } = input;

        plan.validate().map_err(ExecutorError::InvalidPlan)?;

        let total_stages = plan.total_stages();
        let terminal_role = plan.terminal_role();
        info!(
            "Executing plan {} ({} stage(s), {} agent(s))",
            plan.plan_id(),
            total_stages,
            plan.agent_count()
        );

        let mut state = PlanState::Pending;
        let mut results = Vec::with_capacity(plan.agent_count());

        for stage in plan.stages() {
            state = state
                .enter_stage(stage.stage_index())
                .map_err(ExecutorError::IllegalState)?;

            let has_terminal = terminal_role.is_some_and(|role| stage.contains(role))
                && stage.stage_index() == total_stages;
            emitter
                .emit(StreamEvent::stage_status(
                    StatusLabel::for_stage(has_terminal),
                    stage.stage_index(),
                    total_stages,
                ))
                .await;

            let stage_results = match self.run_stage(stage, context.view(), emitter).await {
                Ok(stage_results) => stage_results,
                Err(e) => {
                    if let Ok(failed) = state.fail(e.to_string()) {
                        debug!("Plan {} is {}", plan.plan_id(), failed);
                    }
                    return Err(e);
                }
            };

            for result in &stage_results {
                match (&result.content, result.is_success()) {
                    (Some(content), true) => context.merge_output(result.agent_role, content.clone()),
                    _ => {
                        if let Some(message) = &result.warning {
                            context.push_warning(AgentWarning::new(result.agent_role, message.clone()));
                        }
                    }
                }
            }
            usage
                .record_all(stage_results.iter().map(|r| r.usage.clone()))
                .map_err(ExecutorError::Usage)?;
            results.extend(stage_results);
        }

        let state = state.complete().map_err(ExecutorError::IllegalState)?;
        debug!("Plan {} is {}", plan.plan_id(), state);

        let final_output = Self::final_output(&plan, &results, &mut context);
        let agents_used = plan
            .stages()
            .iter()
            .flat_map(|stage| stage.roles())
            .collect();

        info!(
            "Plan {} completed: {} input / {} output tokens, {} WTU",
            plan.plan_id(),
            usage.total_input_tokens(),
            usage.total_output_tokens(),
            usage.total_cost_units()
        );

        Ok(ExecutionResult {
            plan_id: plan.plan_id().to_string(),
            request_type: plan.metadata().request_type,
            final_output,
            results,
            usage,
            warnings: context.into_warnings(),
            agents_used,
            used_contents,
        })
    }

    fn final_output(
        plan: &ExecutionPlan,
        results: &[AgentResult],
        context: &mut OrchestrationContext,
    ) -> Option<FinalOutput> {
        let Some(role) = plan.terminal_role() else {
            context.push_warning(AgentWarning::new(
                AgentRole::Writer,
                "no final output: plan has no writer stage",
            ));
            return None;
        };

        let output = results
            .iter()
            .find(|r| r.agent_role == role && r.is_success())
            .and_then(|r| r.output.as_ref());

        match output {
            Some(AgentOutput::Draft { title, body }) => Some(FinalOutput {
                title: title.clone(),
                body: body.clone(),
            }),
            Some(AgentOutput::Text { text }) => Some(FinalOutput {
                title: draftsmith_domain::extract_title(text),
                body: text.clone(),
            }),
            _ => {
                context.push_warning(AgentWarning::new(
                    role,
                    format!(
                        "no final output: {} (stage {}) did not succeed",
                        role,
                        plan.total_stages()
                    ),
                ));
                None
            }
        }
    }

    /// Run one stage against the snapshot taken when it started.
    ///
    /// Results come back in AgentSpec order.
    async fn run_stage(
        &self,
        stage: &PlanStage,
        view: ContextView,
        emitter: &Emitter<'_>,
    ) -> Result<Vec<AgentResult>, ExecutorError> {
        let index = stage.stage_index();
        for spec in stage.agents() {
            emitter
                .emit(StreamEvent::AgentStart {
                    agent: spec.agent_role,
                    stage: index,
                    reason: spec.reason.clone(),
                })
                .await;
        }

        let slots: Arc<Vec<OnceLock<AgentResult>>> =
            Arc::new(stage.agents().iter().map(|_| OnceLock::new()).collect());

        if stage.is_parallel() {
            debug!("Stage {}: fan-out of {} agent(s)", index, stage.agents().len());
            let mut join_set = JoinSet::new();
            for (slot, spec) in stage.agents().iter().enumerate() {
                let runner = self.runner.clone();
                let view = view.clone();
                let slots = Arc::clone(&slots);
                let role = spec.agent_role;

                join_set.spawn(async move {
                    let result = runner.run(role, &view).await;
                    let _ = slots[slot].set(result);
                    slot
                });
            }

            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(slot) => {
                        if let Some(result) = slots[slot].get() {
                            Self::emit_result(emitter, index, result).await;
                        }
                    }
                    Err(e) => warn!("Agent task in stage {} did not finish: {}", index, e),
                }
            }
        } else {
            // One task at a time, so a panicking agent leaves its slot empty
            // the same way it would in a parallel stage.
            for (slot, spec) in stage.agents().iter().enumerate() {
                let runner = self.runner.clone();
                let view = view.clone();
                let role = spec.agent_role;
                match tokio::spawn(async move { runner.run(role, &view).await }).await {
                    Ok(result) => {
                        Self::emit_result(emitter, index, &result).await;
                        let _ = slots[slot].set(result);
                    }
                    Err(e) => warn!("Agent task in stage {} did not finish: {}", index, e),
                }
            }
        }

        let mut results = Vec::with_capacity(slots.len());
        let mut missing = Vec::new();
        for (slot, spec) in slots.iter().zip(stage.agents()) {
            match slot.get() {
                Some(result) => results.push(result.clone()),
                None => missing.push(spec.agent_role),
            }
        }
        if !missing.is_empty() {
            return Err(ExecutorError::IncompleteStage {
                stage: index,
                missing,
            });
        }
        Ok(results)
    }

    async fn emit_result(emitter: &Emitter<'_>, stage: usize, result: &AgentResult) {
        let agent = result.agent_role;
        match (&result.content, result.is_success()) {
            (Some(content), true) => {
                for fragment in fragments(content) {
                    emitter
                        .emit(StreamEvent::AgentChunk {
                            agent,
                            stage,
                            text: fragment.to_string(),
                        })
                        .await;
                }
                emitter
                    .emit(StreamEvent::AgentDone {
                        agent,
                        stage,
                        model_used: result.usage.model_used.clone(),
                        input_tokens: result.usage.input_tokens,
                        output_tokens: result.usage.output_tokens,
                        cost_units: result.usage.cost_units,
                    })
                    .await;
            }
            _ => {
                emitter
                    .emit(StreamEvent::AgentError {
                        agent,
                        stage,
                        status: result.status,
                        message: result.warning.clone().unwrap_or_default(),
                    })
                    .await;
            }
        }
    }
}
