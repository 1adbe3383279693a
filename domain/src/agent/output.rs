//! Role-specific extraction results

use super::plan_parser::PlannerDecision;
use crate::util::truncate_chars;
use serde::{Deserialize, Serialize};

/// Maximum title length (in characters) when the title is taken from a
/// plain first line.
pub const MAX_TITLE_CHARS: usize = 50;

/// What an agent extracted from its raw model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentOutput {
    /// Plain text handed to later stages unchanged
    Text { text: String },
    /// Writer output: a titled document
    Draft { title: String, body: String },
    /// Planner output; `None` when the response could not be parsed
    Decision { decision: Option<PlannerDecision> },
}

impl AgentOutput {
    pub fn text(text: impl Into<String>) -> Self {
        AgentOutput::Text { text: text.into() }
    }

    /// Build a draft from raw writer output. The body is always the full
    /// text; only the title is derived.
    pub fn draft(raw: &str) -> Self {
        AgentOutput::Draft {
            title: extract_title(raw),
            body: raw.to_string(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            AgentOutput::Draft { title, .. } => Some(title),
            _ => None,
        }
    }

    pub fn decision(&self) -> Option<&PlannerDecision> {
        match self {
            AgentOutput::Decision { decision } => decision.as_ref(),
            _ => None,
        }
    }
}

/// Derive a document title from its first non-empty line.
///
/// A markdown heading (`# Title`, `## Title`) yields the heading text.
/// Any other line is trimmed and cut to [`MAX_TITLE_CHARS`] characters.
pub fn extract_title(text: &str) -> String {
    let Some(first) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return String::new();
    };

    if first.starts_with('#') {
        return first.trim_start_matches('#').trim().to_string();
    }

    truncate_chars(first, MAX_TITLE_CHARS).trim_end().to_string()
}
