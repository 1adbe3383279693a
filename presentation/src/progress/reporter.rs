//! Progress reporting from the orchestration event stream

use async_trait::async_trait;
use colored::Colorize;
use draftsmith_application::{EventSink, SinkClosed};
use draftsmith_domain::{StatusLabel, StreamEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

fn label_name(label: StatusLabel) -> &'static str {
    match label {
        StatusLabel::Planning => "Planning",
        StatusLabel::Processing => "Processing",
        StatusLabel::Writing => "Writing",
    }
}

/// Renders stage progress as an indicatif bar on stderr
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut bar) = self.bar.lock() {
            f(&mut bar);
        }
    }

    fn handle(&self, event: &StreamEvent) {
        match event {
            StreamEvent::Status {
                label,
                stage,
                total_stages,
                ..
            } => self.with_bar(|bar| {
                let pb = bar.get_or_insert_with(|| {
                    let pb = ProgressBar::new(0);
                    pb.set_style(Self::stage_style());
                    pb
                });
                pb.set_prefix(label_name(*label));
                if let (Some(stage), Some(total)) = (stage, total_stages) {
                    pb.set_length(*total as u64);
                    pb.set_position(stage.saturating_sub(1) as u64);
                }
            }),
            StreamEvent::AgentStart { agent, .. } => self.with_bar(|bar| {
                if let Some(pb) = bar.as_ref() {
                    pb.set_message(format!("{} ...", agent));
                }
            }),
            StreamEvent::AgentDone {
                agent, model_used, ..
            } => self.with_bar(|bar| {
                if let Some(pb) = bar.as_ref() {
                    let model = model_used.as_ref().map(|m| m.as_str()).unwrap_or("-");
                    pb.set_message(format!("{} {} ({})", "v".green(), agent, model));
                }
            }),
            StreamEvent::AgentError { agent, status, .. } => self.with_bar(|bar| {
                if let Some(pb) = bar.as_ref() {
                    pb.set_message(format!("{} {} {}", "x".red(), agent, status.as_str()));
                }
            }),
            StreamEvent::Done(_) => self.with_bar(|bar| {
                if let Some(pb) = bar.take() {
                    if let Some(length) = pb.length() {
                        pb.set_position(length);
                    }
                    pb.finish_with_message(format!("{}", "complete!".green()));
                }
            }),
            StreamEvent::Error { message, .. } => self.with_bar(|bar| {
                if let Some(pb) = bar.take() {
                    pb.abandon_with_message(format!("{} {}", "failed:".red(), message));
                }
            }),
            StreamEvent::Plan(_) | StreamEvent::AgentChunk { .. } | StreamEvent::Chunk { .. } => {}
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for ProgressReporter {
    async fn send(&self, event: StreamEvent) -> Result<(), SinkClosed> {
        self.handle(&event);
        Ok(())
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SimpleProgress {
    pub fn line(event: &StreamEvent) -> Option<String> {
        match event {
            StreamEvent::Status {
                label,
                stage: Some(stage),
                total_stages: Some(total),
                ..
            } => Some(format!(
                "{} {} (stage {}/{})",
                "->".cyan(),
                label_name(*label).bold(),
                stage,
                total
            )),
            StreamEvent::Status { label, .. } => {
                Some(format!("{} {}", "->".cyan(), label_name(*label).bold()))
            }
            StreamEvent::AgentDone {
                agent,
                model_used,
                cost_units,
                ..
            } => Some(format!(
                "  {} {} ({}, {} WTU)",
                "v".green(),
                agent,
                model_used.as_ref().map(|m| m.as_str()).unwrap_or("-"),
                cost_units
            )),
            StreamEvent::AgentError { agent, message, .. } => {
                Some(format!("  {} {} ({})", "x".red(), agent, message))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl EventSink for SimpleProgress {
    async fn send(&self, event: StreamEvent) -> Result<(), SinkClosed> {
        if let Some(line) = Self::line(&event) {
            eprintln!("{}", line);
        }
        Ok(())
    }
}
