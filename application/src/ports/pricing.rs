//! Pricing and token counting ports
//!
//! Both are pure functions of their inputs; the tables behind them live in
//! the infrastructure layer.

use draftsmith_domain::Model;

/// Converts token counts into weighted token units (WTU)
pub trait CostCalculator: Send + Sync {
    fn cost_units(&self, model: &Model, input_tokens: u64, output_tokens: u64) -> u64;
}

/// Counts tokens locally when a provider does not report usage
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str, model: &Model) -> u64;
}
