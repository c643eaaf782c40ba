//! Step executor - runs individual steps and records them as runs

use crate::{
    core::{PipelineState, StateUpdate, Step, StepError},
    run_log::{record_best_effort, RunLogOutcome, RunLogger, RunRecord},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of executing a step successfully
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Partial update returned by the step
    pub update: StateUpdate,
    /// What happened to the run-log call
    pub run_log: RunLogOutcome,
}

/// Executes a single step
pub struct StepExecutor {
    run_logger: Arc<dyn RunLogger>,
}

impl StepExecutor {
    pub fn new(run_logger: Arc<dyn RunLogger>) -> Self {
        Self { run_logger }
    }

    /// Run a step against the current state
    ///
    /// A step error is returned unchanged and nothing is logged for it. On
    /// success the run is logged best-effort; a logging failure only shows
    /// up in the report.
    pub async fn execute(
        &self,
        step: &dyn Step,
        state: &PipelineState,
        execution_id: Uuid,
    ) -> Result<StepReport, StepError> {
        info!("Executing step: {}", step.name());

        let started_at = Utc::now();
        let update = step.run(state).await?;
        let completed_at = Utc::now();

        debug!("Step {} updated fields {:?}", step.name(), update.fields());

        let run = RunRecord::for_step(step.name(), execution_id, state, &update, started_at, completed_at);

        let run_log = match run {
            Ok(run) => record_best_effort(self.run_logger.as_ref(), &run).await,
            Err(e) => {
                warn!("Could not encode run for step '{}': {}", step.name(), e);
                RunLogOutcome::Failed(e.to_string())
            }
        };

        Ok(StepReport { update, run_log })
    }
}
