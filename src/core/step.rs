//! Step abstraction

use crate::agent::AgentError;
use crate::core::state::{PipelineState, StateError, StateUpdate};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a step can fail with
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// A single named step in a pipeline
///
/// A step reads the current state and returns the partial update to merge.
/// Any error it returns aborts the run.
#[async_trait]
pub trait Step: Send + Sync {
    /// Unique name of the step within its pipeline
    fn name(&self) -> &str;

    /// Run the step against a snapshot of the state
    async fn run(&self, state: &PipelineState) -> Result<StateUpdate, StepError>;
}

/// A step built from a synchronous closure
pub struct FnStep<F> {
    name: String,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(&PipelineState) -> Result<StateUpdate, StepError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: Fn(&PipelineState) -> Result<StateUpdate, StepError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: &PipelineState) -> Result<StateUpdate, StepError> {
        (self.func)(state)
    }
}
