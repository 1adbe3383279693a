//! Shared agent run loop
//!
//! Every role runs the same way: build messages, invoke the role's tier,
//! extract the result. Provider exhaustion turns into a `skipped` result and
//! any other problem into a `failed` one; `run` itself never fails.

use crate::config::ModelPreferences;
use crate::invocation::ModelInvoker;
use crate::ports::model_provider::ModelProvider;
use crate::ports::pricing::CostCalculator;
use draftsmith_domain::{
    AgentResult, AgentRole, AgentUsage, CompletionOptions, ContextView, Invocation,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AgentRunner<P: ModelProvider + 'static> {
    invoker: Arc<ModelInvoker<P>>,
    cost_calculator: Arc<dyn CostCalculator>,
    preferences: ModelPreferences,
}

impl<P: ModelProvider + 'static> Clone for AgentRunner<P> {
    fn clone(&self) -> Self {
        Self {
            invoker: Arc::clone(&self.invoker),
            cost_calculator: Arc::clone(&self.cost_calculator),
            preferences: self.preferences.clone(),
        }
    }
}

impl<P: ModelProvider + 'static> AgentRunner<P> {
    pub fn new(invoker: Arc<ModelInvoker<P>>, cost_calculator: Arc<dyn CostCalculator>) -> Self {
        Self {
            invoker,
            cost_calculator,
            preferences: ModelPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: ModelPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn invoker(&self) -> &ModelInvoker<P> {
        &self.invoker
    }

    /// Run one agent against a context snapshot.
    pub async fn run(&self, role: AgentRole, view: &ContextView) -> AgentResult {
        let behavior = role.behavior();
        let messages = behavior.build_messages(view);
        let options = CompletionOptions::default().with_temperature(role.temperature());
        let tier = role.tier();

        debug!("Running {} agent on tier {}", role, tier);
        let invocation = match self
            .invoker
            .invoke(tier, &messages, &options, self.preferences.get(tier))
            .await
        {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!("{} agent skipped: {}", role, e);
                return AgentResult::skipped(role);
            }
        };

        let usage = self.usage_of(role, &invocation);
        if invocation.content.trim().is_empty() {
            warn!("{} agent got an empty response from {}", role, invocation.model_used);
            return AgentResult::failed(
                role,
                format!("{role} failed: empty response from {}", invocation.model_used),
            )
            .with_usage(usage);
        }

        let output = behavior.extract_result(&invocation.content);
        AgentResult::success(invocation.content, output, usage)
    }

    fn usage_of(&self, role: AgentRole, invocation: &Invocation) -> AgentUsage {
        AgentUsage {
            agent_role: role,
            model_used: Some(invocation.model_used.clone()),
            input_tokens: invocation.input_tokens,
            output_tokens: invocation.output_tokens,
            cost_units: self.cost_calculator.cost_units(
                &invocation.model_used,
                invocation.input_tokens,
                invocation.output_tokens,
            ),
        }
    }
}
