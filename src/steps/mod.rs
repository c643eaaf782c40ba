//! The research-then-write steps

pub mod researcher;
pub mod writer;

pub use researcher::{Researcher, RESEARCHER};
pub use writer::{Writer, WRITER};

use crate::agent::AgentExecutor;
use crate::core::{Pipeline, PipelineError};
use std::sync::Arc;

pub const PIPELINE_NAME: &str = "research-then-write";

/// `researcher` followed by `writer`, both sharing one agent
pub fn research_pipeline(agent: Arc<dyn AgentExecutor>) -> Result<Pipeline, PipelineError> {
    Pipeline::new(PIPELINE_NAME)
        .with_step(Researcher::new(agent.clone()))?
        .with_step(Writer::new(agent))
}
