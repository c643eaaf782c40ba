//! Researcher step - summarises the topic

use crate::agent::AgentExecutor;
use crate::core::{PipelineState, StateUpdate, Step, StepError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub const RESEARCHER: &str = "researcher";

/// Asks the model for a 3-sentence research summary of `topic`
pub struct Researcher {
    agent: Arc<dyn AgentExecutor>,
}

impl Researcher {
    pub fn new(agent: Arc<dyn AgentExecutor>) -> Self {
        Self { agent }
    }

    pub fn prompt(topic: &str) -> String {
        format!("Research the topic: {} in 3 sentences.", topic)
    }
}

#[async_trait]
impl Step for Researcher {
    fn name(&self) -> &str {
        RESEARCHER
    }

    async fn run(&self, state: &PipelineState) -> Result<StateUpdate, StepError> {
        if state.topic.trim().is_empty() {
            warn!("Step {} running with an empty topic", RESEARCHER);
        }
        let response = self.agent.execute(&Self::prompt(&state.topic)).await?;
        Ok(StateUpdate::research(response.content))
    }
}
