//! CLI output formatting

use crate::{
    core::PipelineState,
    execution::{ExecutionEvent, ExecutionStatus},
    run_log::RunLogOutcome,
};
use anyhow::Result;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

pub const FINAL_STATE_HEADER: &str = "=== FINAL STATE ===";

/// Render the final state as 4-space indented JSON
///
/// Non-ASCII text is written as-is, never `\u` escaped.
pub fn format_final_state(state: &PipelineState) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    state.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Render the final state as a single line of JSON
pub fn format_final_state_compact(state: &PipelineState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Format an execution event for display
///
/// Returns `None` for events that only drive the spinner.
pub fn format_execution_event(event: &ExecutionEvent) -> Option<String> {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name,
            total_steps,
        } => Some(format!(
            "{} Starting pipeline {} with {} steps ({})",
            ROCKET,
            style(pipeline_name).bold(),
            total_steps,
            style(&execution_id.to_string()[..8]).dim()
        )),
        ExecutionEvent::StepStarted { .. } => None,
        ExecutionEvent::StepCompleted {
            step_name,
            updated,
            run_log,
        } => {
            let fields = updated
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let mut line = format!(
                "{} {} {}",
                CHECK,
                style(step_name).green(),
                style(format!("→ {}", fields)).dim()
            );
            match run_log {
                RunLogOutcome::Recorded => line.push_str(&format!(" {}", style("(traced)").dim())),
                RunLogOutcome::Disabled => {}
                RunLogOutcome::Failed(reason) => line.push_str(&format!(
                    "\n{} {}",
                    WARN,
                    style(format!("run logging failed for '{}': {}", step_name, reason)).yellow()
                )),
            }
            Some(line)
        }
        ExecutionEvent::StepFailed { step_name, error } => Some(format!(
            "{} {}: {}",
            CROSS,
            style(step_name).red(),
            style(error).dim()
        )),
        ExecutionEvent::PipelineCompleted {
            execution_id,
            status,
        } => {
            let status_str = match status {
                ExecutionStatus::Completed => format!("{} completed", style("successfully").green()),
                ExecutionStatus::Failed => style("failed").red().to_string(),
            };
            Some(format!(
                "{} Pipeline ({}) {}",
                INFO,
                style(&execution_id.to_string()[..8]).dim(),
                status_str
            ))
        }
    }
}

/// Spinner shown on stderr while a step waits on the model
#[derive(Default)]
pub struct StepSpinner {
    current: Mutex<Option<ProgressBar>>,
}

impl StepSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the spinner for an event and return the line to print, if any
    pub fn handle(&self, event: &ExecutionEvent) -> Option<String> {
        if let ExecutionEvent::StepStarted {
            step_name,
            position,
            total_steps,
        } = event
        {
            self.start(format!("[{}/{}] {}", position, total_steps, step_name));
        } else {
            self.finish();
        }
        format_execution_event(event)
    }

    fn start(&self, message: String) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed:.dim}") {
            spinner.set_style(template);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(spinner) {
                previous.finish_and_clear();
            }
        }
    }

    fn finish(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(spinner) = current.take() {
                spinner.finish_and_clear();
            }
        }
    }
}
