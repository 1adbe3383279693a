//! Output formatter trait

use draftsmith_domain::OrchestrationResponse;

/// Trait for formatting orchestration responses
pub trait OutputFormatter {
    /// Title, document, warnings and usage
    fn format(&self, response: &OrchestrationResponse) -> String;

    /// Response JSON
    fn format_json(&self, response: &OrchestrationResponse) -> String;
}
