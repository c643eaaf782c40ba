//! Writer step - drafts an article from the research

use crate::agent::AgentExecutor;
use crate::core::{PipelineState, StateUpdate, Step, StepError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub const WRITER: &str = "writer";

/// Asks the model for a concise article draft based on `research`
pub struct Writer {
    agent: Arc<dyn AgentExecutor>,
}

impl Writer {
    pub fn new(agent: Arc<dyn AgentExecutor>) -> Self {
        Self { agent }
    }

    pub fn prompt(research: &str) -> String {
        format!(
            "Write a concise article draft based on this research:\n{}",
            research
        )
    }
}

#[async_trait]
impl Step for Writer {
    fn name(&self) -> &str {
        WRITER
    }

    async fn run(&self, state: &PipelineState) -> Result<StateUpdate, StepError> {
        if state.research.trim().is_empty() {
            warn!("Step {} running with empty research", WRITER);
        }
        let response = self.agent.execute(&Self::prompt(&state.research)).await?;
        Ok(StateUpdate::draft(response.content))
    }
}
