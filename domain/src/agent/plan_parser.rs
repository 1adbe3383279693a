//! Planner decision parsing from LLM responses.
//!
//! The planner is asked to answer with JSON naming the agents it needs:
//!
//! ```json
//! {"agents": [{"agent": "summarizer", "reason": "two notes selected"}]}
//! ```
//!
//! The JSON may arrive in a ` ```json ` or ` ```plan ` fenced block, or as the
//! whole response. Unknown agent names are ignored.

use crate::agent::role::AgentRole;
use serde::{Deserialize, Serialize};

/// One agent the planner asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAgent {
    pub role: AgentRole,
    pub reason: String,
}

/// Set of roles the planner decided are needed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerDecision {
    pub agents: Vec<PlannedAgent>,
}

impl PlannerDecision {
    pub fn contains(&self, role: AgentRole) -> bool {
        self.agents.iter().any(|agent| agent.role == role)
    }

    /// Reason the planner gave for `role`, if it asked for it.
    pub fn reason_for(&self, role: AgentRole) -> Option<&str> {
        self.agents
            .iter()
            .find(|agent| agent.role == role)
            .map(|agent| agent.reason.as_str())
    }
}

/// Parse a planner decision from model response text.
///
/// Returns `None` when no JSON object is found, or when it names no known
/// agent.
pub fn parse_decision(response: &str) -> Option<PlannerDecision> {
    let mut in_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```json" || trimmed == "```plan") {
            in_block = true;
            current_block.clear();
        } else if in_block && trimmed == "```" {
            in_block = false;
            if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&current_block) {
                return parse_decision_json(&parsed);
            }
        } else if in_block {
            current_block.push_str(line);
            current_block.push('\n');
        }
    }

    serde_json::from_str::<serde_json::Value>(response.trim())
        .ok()
        .and_then(|parsed| parse_decision_json(&parsed))
}

/// Parse a planner decision from a JSON value.
///
/// Entries may be objects (`{"agent": "writer", "reason": ".."}`) or bare
/// role strings (`"writer"`). The planner role itself and duplicates are
/// dropped.
pub fn parse_decision_json(json: &serde_json::Value) -> Option<PlannerDecision> {
    let entries = json.get("agents")?.as_array()?;

    let mut decision = PlannerDecision::default();
    for entry in entries {
        let (name, reason) = match entry {
            serde_json::Value::String(name) => (name.as_str(), ""),
            serde_json::Value::Object(_) => {
                let Some(name) = entry.get("agent").and_then(|v| v.as_str()) else {
                    continue;
                };
                let reason = entry.get("reason").and_then(|v| v.as_str()).unwrap_or("");
                (name, reason)
            }
            _ => continue,
        };

        let Ok(role) = name.parse::<AgentRole>() else {
            continue;
        };
        if role == AgentRole::Planner || decision.contains(role) {
            continue;
        }
        decision.agents.push(PlannedAgent {
            role,
            reason: reason.to_string(),
        });
    }

    if decision.agents.is_empty() {
        None
    } else {
        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_json() {
        let response = r#"
I will need these agents:

```json
{
  "agents": [
    {"agent": "summarizer", "reason": "three notes selected"},
    {"agent": "writer", "reason": "always"}
  ]
}
```
"#;
        let decision = parse_decision(response).unwrap();
        assert_eq!(decision.agents.len(), 2);
        assert!(decision.contains(AgentRole::Summarizer));
        assert_eq!(decision.reason_for(AgentRole::Summarizer), Some("three notes selected"));
        assert!(!decision.contains(AgentRole::Researcher));
    }

    #[test]
    fn test_parse_raw_json_with_bare_names() {
        let decision = parse_decision(r#"{"agents": ["researcher", "Writer"]}"#).unwrap();
        assert!(decision.contains(AgentRole::Researcher));
        assert!(decision.contains(AgentRole::Writer));
    }

    #[test]
    fn test_unknown_and_duplicate_agents_are_dropped() {
        let decision = parse_decision(
            r#"{"agents": [{"agent": "poet"}, {"agent": "writer"}, {"agent": "writer"}, {"agent": "planner"}]}"#,
        )
        .unwrap();
        assert_eq!(decision.agents.len(), 1);
    }

    #[test]
    fn test_plain_text_returns_none() {
        assert!(parse_decision("Use the summarizer and the writer.").is_none());
    }

    #[test]
    fn test_no_known_agents_returns_none() {
        assert!(parse_decision(r#"{"agents": []}"#).is_none());
        assert!(parse_decision(r#"{"agents": ["poet"]}"#).is_none());
    }
}
