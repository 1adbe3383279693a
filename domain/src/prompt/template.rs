//! Prompt templates for each agent role

use crate::agent::role::AgentRole;
use crate::content::entities::{Connection, SelectedContent};
use std::collections::BTreeMap;

/// Templates for generating prompts at each role
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the planner
    pub fn planner_system() -> &'static str {
        r#"You are the planner of a writing assistant.
Decide which specialist agents are needed to answer the user's request.

Available agents:
- summarizer: condenses the selected contents
- researcher: searches the web for current information
- analyzer: compares and structures several sources and their relations
- writer: writes the final answer (always required)

Respond ONLY with JSON in this form:
```json
{"agents": [{"agent": "summarizer", "reason": "why it is needed"}]}
```"#
    }

    /// User prompt for the planner
    pub fn planner_prompt(
        prompt: &str,
        retrieval_mode: &str,
        content_count: usize,
        connection_count: usize,
    ) -> String {
        format!(
            r#"Request: {prompt}

Retrieval mode: {retrieval_mode}
Selected contents: {content_count}
Connections between contents: {connection_count}

Which agents are needed?"#
        )
    }

    /// System prompt for the summarizer
    pub fn summarizer_system() -> &'static str {
        r#"You are an expert at condensing source material.
Summarize the provided contents faithfully, keeping the facts, figures and
claims that matter for the user's request. Do not add information that is not
in the sources. Use concise markdown."#
    }

    /// User prompt for the summarizer
    pub fn summarizer_prompt(prompt: &str, contents: &[SelectedContent]) -> String {
        format!(
            "User request:\n{prompt}\n\nContents to summarize:\n{}\n\nWrite a summary focused on the request.",
            Self::format_contents(contents)
        )
    }

    /// System prompt for the researcher
    pub fn researcher_system() -> &'static str {
        r#"You are a research assistant with web access.
Find current, verifiable information relevant to the user's request and
report it as concise notes. Cite the sources you used."#
    }

    /// User prompt for the researcher
    pub fn researcher_prompt(prompt: &str, content_titles: &[&str]) -> String {
        let mut out = format!("Research the following request:\n{prompt}\n");
        if !content_titles.is_empty() {
            out.push_str("\nThe user is also working with these items:\n");
            for title in content_titles {
                out.push_str(&format!("- {title}\n"));
            }
        }
        out
    }

    /// System prompt for the analyzer
    pub fn analyzer_system() -> &'static str {
        r#"You are an analyst who structures information from several sources.
Compare the sources, surface agreements and contradictions, and organize the
key points into a clear outline the writer can build on."#
    }

    /// User prompt for the analyzer
    pub fn analyzer_prompt(
        prompt: &str,
        contents: &[SelectedContent],
        connections: &[Connection],
        prior_outputs: &BTreeMap<AgentRole, String>,
    ) -> String {
        let mut out = format!("User request:\n{prompt}\n");

        if !contents.is_empty() {
            out.push_str("\nSources:\n");
            for content in contents {
                out.push_str(&format!("- [{}] {}\n", content.content_id, content.title));
            }
        }

        if !connections.is_empty() {
            out.push_str("\nRelations drawn by the user:\n");
            for connection in connections {
                let label = connection.label.as_deref().unwrap_or("related to");
                out.push_str(&format!(
                    "- [{}] {} [{}]\n",
                    connection.from_content_id, label, connection.to_content_id
                ));
            }
        }

        out.push_str(&Self::format_prior_outputs(prior_outputs));
        out.push_str("\nProduce a structured analysis.");
        out
    }

    /// System prompt for the writer
    pub fn writer_system() -> &'static str {
        r#"You are an expert content writer who creates well-structured documents.
Use markdown with headings and lists where they help. Start with a level-one
heading that serves as the title. Base the text on the provided context and
the user's requirements."#
    }

    /// User prompt for the writer.
    ///
    /// Every accumulated output is included verbatim. Raw contents are added
    /// only when no summary of them exists yet.
    pub fn writer_prompt(
        prompt: &str,
        contents: &[SelectedContent],
        prior_outputs: &BTreeMap<AgentRole, String>,
    ) -> String {
        let mut out = format!("User requirements:\n{prompt}\n");
        out.push_str(&Self::format_prior_outputs(prior_outputs));

        if !contents.is_empty() && !prior_outputs.contains_key(&AgentRole::Summarizer) {
            out.push_str("\nSource contents:\n");
            out.push_str(&Self::format_contents(contents));
        }

        out.push_str("\nWrite the complete document now.");
        out
    }

    fn format_contents(contents: &[SelectedContent]) -> String {
        let mut out = String::new();
        for content in contents {
            out.push_str(&format!(
                "\n--- [{}] {} ---\n{}\n",
                content.content_id,
                content.title,
                content.body()
            ));
        }
        out
    }

    fn format_prior_outputs(prior_outputs: &BTreeMap<AgentRole, String>) -> String {
        let mut out = String::new();
        for (role, content) in prior_outputs {
            out.push_str(&format!("\n--- {role} output ---\n{content}\n"));
        }
        out
    }
}
