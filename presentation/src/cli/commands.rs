//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use draftsmith_domain::{Model, RequestType, RetrievalMode, Tier};
use std::path::PathBuf;

/// Output format for orchestration results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Title, document, warnings and usage
    Markdown,
    /// Response JSON
    Json,
}

/// CLI arguments for draftsmith
#[derive(Parser, Debug)]
#[command(name = "draftsmith")]
#[command(author, version, about = "Multi-agent answer and draft generation over your notes")]
#[command(long_about = r#"
draftsmith answers questions and writes drafts grounded in a set of selected
contents, by running a plan of specialised agents (summarizer, researcher,
analyzer, writer).

  ask    plan the agents with a planner model, then answer in markdown
  draft  summarize the selected contents, then write a titled draft

Configuration files are loaded from (in priority order):
1. --config <path>                        Explicit config file
2. ./draftsmith.toml                      Project-level config
3. ~/.config/draftsmith/config.toml       Global config
4. DRAFTSMITH_* environment variables     Override every file

Example:
  draftsmith ask "What do my notes say about caching?" --contents notes.json
  draftsmith draft "Weekly summary" --contents notes.json --id 3 --id 7
  draftsmith ask "Latest news on Rust 2024" --retrieval web-only --stream
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write tracing logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a question (planner-driven)
    Ask(RequestArgs),
    /// Write a draft from the selected contents
    Draft(RequestArgs),
}

impl Command {
    pub fn request_type(&self) -> RequestType {
        match self {
            Command::Ask(_) => RequestType::Ask,
            Command::Draft(_) => RequestType::Draft,
        }
    }

    pub fn args(&self) -> &RequestArgs {
        match self {
            Command::Ask(args) | Command::Draft(args) => args,
        }
    }
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// The question or drafting instruction
    pub prompt: String,

    /// JSON file with the available contents
    #[arg(long, value_name = "FILE")]
    pub contents: Option<PathBuf>,

    /// Content ids to select (default: every content in --contents)
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<i64>,

    /// JSON file with connections between contents
    #[arg(long, value_name = "FILE")]
    pub connections: Option<PathBuf>,

    /// Sources agents may use: auto, rag-only, web-only, both
    #[arg(long, value_name = "MODE", default_value = "auto", value_parser = parse_retrieval)]
    pub retrieval: RetrievalMode,

    /// Preferred model for a tier, tried first (can be specified multiple times)
    #[arg(long, value_name = "TIER=MODEL", value_parser = parse_preference)]
    pub prefer: Vec<(Tier, Model)>,

    /// Print server-sent event frames instead of the final result
    #[arg(long)]
    pub stream: bool,

    /// Include per-agent events in the stream
    #[arg(long)]
    pub verbose_events: bool,

    /// Output format (default from config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Append every stream event to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_retrieval(s: &str) -> Result<RetrievalMode, String> {
    s.parse().map_err(|e: draftsmith_domain::DomainError| e.to_string())
}

/// Parse `tier=model`, e.g. `premium=claude-4.5-opus`.
pub fn parse_preference(s: &str) -> Result<(Tier, Model), String> {
    let (tier, model) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TIER=MODEL, got '{s}'"))?;
    let tier: Tier = tier.parse().map_err(|e: draftsmith_domain::DomainError| e.to_string())?;
    let model = model.trim();
    if model.is_empty() {
        return Err(format!("missing model for tier '{tier}'"));
    }
    Ok((tier, Model::from(model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_flags() {
        let cli = Cli::try_parse_from([
            "draftsmith",
            "-vv",
            "ask",
            "What changed?",
            "--contents",
            "notes.json",
            "--id",
            "3",
            "--id",
            "7",
            "--retrieval",
            "rag-only",
            "--prefer",
            "premium=claude-4.5-opus",
            "--stream",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let command = cli.command.unwrap();
        assert_eq!(command.request_type(), RequestType::Ask);
        let args = command.args();
        assert_eq!(args.prompt, "What changed?");
        assert_eq!(args.ids, vec![3, 7]);
        assert_eq!(args.retrieval, RetrievalMode::RagOnly);
        assert_eq!(args.prefer, vec![(Tier::Premium, Model::ClaudeOpus45)]);
        assert!(args.stream);
        assert!(!args.verbose_events);
        assert_eq!(args.output, None);
    }

    #[test]
    fn test_parse_draft_defaults() {
        let cli = Cli::try_parse_from(["draftsmith", "draft", "Weekly summary"]).unwrap();
        let command = cli.command.unwrap();
        assert_eq!(command.request_type(), RequestType::Draft);
        assert_eq!(command.args().retrieval, RetrievalMode::Auto);
        assert!(command.args().contents.is_none());
    }

    #[test]
    fn test_show_config_without_command() {
        let cli = Cli::try_parse_from(["draftsmith", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_unknown_retrieval() {
        assert!(Cli::try_parse_from(["draftsmith", "ask", "q", "--retrieval", "psychic"]).is_err());
    }

    #[test]
    fn test_parse_preference() {
        assert_eq!(
            parse_preference("light=gpt-4.1-mini"),
            Ok((Tier::Light, Model::Gpt41Mini))
        );
        assert!(parse_preference("light").is_err());
        assert!(parse_preference("ultra=gpt-5").is_err());
        assert!(parse_preference("light= ").is_err());
    }
}
