//! Best-effort recording of step runs in a tracing service

pub mod langsmith;

pub use langsmith::{LangSmithConfig, LangSmithRunLogger};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors from a run logger; never fatal to the pipeline
#[derive(Debug, Error)]
pub enum RunLogError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Tracing service rejected the run (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to encode run: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One completed step execution as sent to the tracing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub name: String,
    pub run_type: String,
    pub inputs: serde_json::Value,
    pub outputs: serde_json::Value,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Pipeline execution the step belonged to
    pub execution_id: Uuid,
}

impl RunRecord {
    /// A `chain` run with a fresh id
    pub fn chain(
        name: impl Into<String>,
        execution_id: Uuid,
        inputs: serde_json::Value,
        outputs: serde_json::Value,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            run_type: "chain".to_string(),
            inputs,
            outputs,
            start_time,
            end_time,
            execution_id,
        }
    }

    /// A `chain` run for one step, snapshotting its input and output
    pub fn for_step<I, O>(
        name: impl Into<String>,
        execution_id: Uuid,
        input: &I,
        output: &O,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, RunLogError>
    where
        I: Serialize + ?Sized,
        O: Serialize + ?Sized,
    {
        Ok(Self::chain(
            name,
            execution_id,
            serde_json::to_value(input)?,
            serde_json::to_value(output)?,
            start_time,
            end_time,
        ))
    }
}

/// Trait for run logging backends
#[async_trait::async_trait]
pub trait RunLogger: Send + Sync {
    /// Record a completed run
    async fn record_run(&self, run: &RunRecord) -> Result<(), RunLogError>;

    /// Whether this logger records anything at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Result of a best-effort logging attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunLogOutcome {
    Recorded,
    Disabled,
    Failed(String),
}

/// Record a run, reporting but never propagating a failure
///
/// Only the logging call itself is guarded.
pub async fn record_best_effort(logger: &dyn RunLogger, run: &RunRecord) -> RunLogOutcome {
    if !logger.is_enabled() {
        return RunLogOutcome::Disabled;
    }

    match logger.record_run(run).await {
        Ok(()) => {
            info!("Logged and completed run for step '{}'", run.name);
            RunLogOutcome::Recorded
        }
        Err(e) => {
            warn!("Run logging failed for step '{}': {}", run.name, e);
            RunLogOutcome::Failed(e.to_string())
        }
    }
}

/// Logger used when tracing is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRunLogger;

#[async_trait::async_trait]
impl RunLogger for NoopRunLogger {
    async fn record_run(&self, _run: &RunRecord) -> Result<(), RunLogError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// In-memory run logger (for testing or local inspection)
#[derive(Debug, Default)]
pub struct InMemoryRunLogger {
    runs: tokio::sync::RwLock<Vec<RunRecord>>,
}

impl InMemoryRunLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded runs in recording order
    pub async fn runs(&self) -> Vec<RunRecord> {
        self.runs.read().await.clone()
    }
}

#[async_trait::async_trait]
impl RunLogger for InMemoryRunLogger {
    async fn record_run(&self, run: &RunRecord) -> Result<(), RunLogError> {
        self.runs.write().await.push(run.clone());
        Ok(())
    }
}
