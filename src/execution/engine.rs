//! Main execution engine - runs a pipeline's steps in order

use crate::{
    core::{Pipeline, PipelineState, StateField, StepError},
    execution::StepExecutor,
    run_log::{NoopRunLogger, RunLogOutcome, RunLogger},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Overall outcome of a pipeline execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Completed,
    Failed,
}

/// Fatal errors of a pipeline run
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Step '{step}' failed")]
    StepFailed {
        step: String,
        #[source]
        source: StepError,
    },
}

impl ExecutionError {
    /// Name of the step that aborted the run
    pub fn step(&self) -> &str {
        match self {
            ExecutionError::StepFailed { step, .. } => step,
        }
    }
}

/// Events that can occur during pipeline execution
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
        total_steps: usize,
    },
    StepStarted {
        step_name: String,
        /// Position in the pipeline, starting at 1
        position: usize,
        total_steps: usize,
    },
    StepCompleted {
        step_name: String,
        updated: Vec<StateField>,
        run_log: RunLogOutcome,
    },
    StepFailed {
        step_name: String,
        error: String,
    },
    PipelineCompleted {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Main pipeline execution engine
pub struct ExecutionEngine {
    executor: StepExecutor,
    event_handlers: Vec<EventHandler>,
}

impl ExecutionEngine {
    pub fn new(run_logger: Arc<dyn RunLogger>) -> Self {
        Self {
            executor: StepExecutor::new(run_logger),
            event_handlers: Vec::new(),
        }
    }

    /// Engine that records no runs
    pub fn without_run_log() -> Self {
        Self::new(Arc::new(NoopRunLogger))
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    pub fn with_event_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.add_event_handler(handler);
        self
    }

    /// Emit an event to all handlers, in registration order
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute the entire pipeline
    ///
    /// Steps run one after the other; each sees the state with all earlier
    /// updates merged. The first step error ends the run and no state is
    /// returned.
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        initial: PipelineState,
    ) -> Result<PipelineState, ExecutionError> {
        let execution_id = Uuid::new_v4();
        let total_steps = pipeline.len();

        info!("Starting pipeline execution: {} ({})", pipeline.name, execution_id);
        self.emit_event(ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name: pipeline.name.clone(),
            total_steps,
        });

        let mut state = initial;
        for (index, step) in pipeline.steps().iter().enumerate() {
            self.emit_event(ExecutionEvent::StepStarted {
                step_name: step.name().to_string(),
                position: index + 1,
                total_steps,
            });

            match self.executor.execute(step.as_ref(), &state, execution_id).await {
                Ok(report) => {
                    let updated = report.update.fields();
                    state.apply(report.update);
                    self.emit_event(ExecutionEvent::StepCompleted {
                        step_name: step.name().to_string(),
                        updated,
                        run_log: report.run_log,
                    });
                }
                Err(e) => {
                    error!("Step {} failed: {}", step.name(), e);
                    self.emit_event(ExecutionEvent::StepFailed {
                        step_name: step.name().to_string(),
                        error: e.to_string(),
                    });
                    self.emit_event(ExecutionEvent::PipelineCompleted {
                        execution_id,
                        status: ExecutionStatus::Failed,
                    });
                    return Err(ExecutionError::StepFailed {
                        step: step.name().to_string(),
                        source: e,
                    });
                }
            }
        }

        info!("Pipeline execution finished: {} - {:?}", pipeline.name, ExecutionStatus::Completed);
        self.emit_event(ExecutionEvent::PipelineCompleted {
            execution_id,
            status: ExecutionStatus::Completed,
        });

        Ok(state)
    }
}
