//! Pipeline definition

use crate::core::step::Step;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Pipeline '{pipeline}' already has a step named '{step}'")]
    DuplicateStep { pipeline: String, step: String },
}

/// A named, ordered list of steps
///
/// Steps run in the order they were added; names are unique.
#[derive(Clone)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    steps: Vec<Arc<dyn Step>>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn add_step(&mut self, step: Arc<dyn Step>) -> Result<(), PipelineError> {
        if self.step(step.name()).is_some() {
            return Err(PipelineError::DuplicateStep {
                pipeline: self.name.clone(),
                step: step.name().to_string(),
            });
        }
        self.steps.push(step);
        Ok(())
    }

    /// Builder form of [`add_step`](Self::add_step)
    pub fn with_step(mut self, step: impl Step + 'static) -> Result<Self, PipelineError> {
        self.add_step(Arc::new(step))?;
        Ok(self)
    }

    /// Get a step by name
    pub fn step(&self, name: &str) -> Option<&Arc<dyn Step>> {
        self.steps.iter().find(|s| s.name() == name)
    }

    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }

    /// Step names in execution order
    pub fn execution_order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.execution_order())
            .finish()
    }
}
