//! Console output formatter for orchestration responses

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use draftsmith_domain::OrchestrationResponse;

/// Formats responses for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format(response: &OrchestrationResponse) -> String {
        let mut output = String::new();

        if let Some(title) = response.body.title() {
            output.push_str(&Self::header(title));
            output.push_str("\n\n");
        }

        match response.body.markdown() {
            Some(markdown) => {
                output.push_str(markdown.trim_end());
                output.push('\n');
            }
            None => output.push_str(&format!("{}\n", "(no output generated)".red().bold())),
        }

        if !response.warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in &response.warnings {
                output.push_str(&format!("  * {}\n", warning.message));
            }
        }

        output.push_str(&Self::usage_line(response));
        output
    }

    pub fn format_json(response: &OrchestrationResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn usage_line(response: &OrchestrationResponse) -> String {
        let usage = &response.usage;
        let agents = usage
            .agents
            .iter()
            .map(|(role, wtu)| format!("{}={}", role, wtu.wtu))
            .collect::<Vec<_>>()
            .join(", ");
        let line = format!(
            "{} in / {} out tokens, {} WTU ({}), {} contents",
            usage.input_tokens,
            usage.output_tokens,
            usage.total_wtu,
            agents,
            response.used_contents.len()
        );
        format!("\n{}\n", line.dimmed())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, response: &OrchestrationResponse) -> String {
        Self::format(response)
    }

    fn format_json(&self, response: &OrchestrationResponse) -> String {
        Self::format_json(response)
    }
}
