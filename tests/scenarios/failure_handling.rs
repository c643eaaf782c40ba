//! Test: fatal agent failures abort the run

use crate::helpers::*;
use quill::agent::AgentError;
use quill::core::StepError;
use quill::execution::{ExecutionError, ExecutionEvent, ExecutionStatus};
use quill::run_log::{InMemoryRunLogger, NoopRunLogger};
use std::sync::Arc;

#[tokio::test]
async fn test_researcher_failure_skips_writer() {
    let agent = ScriptedAgent::sequence(&["unused", "unused"]).failing_on(1);

    let result = run_research(agent, Arc::new(NoopRunLogger), "solar power").await;

    let err = result.outcome.unwrap_err();
    assert_eq!(err.step(), "researcher");
    assert!(matches!(
        err,
        ExecutionError::StepFailed { source: StepError::Agent(AgentError::Transport(_)), .. }
    ));

    // Writer never invoked
    assert_eq!(result.prompts.len(), 1);
    assert_eq!(started_steps(&result.events), vec!["researcher"]);
}

#[tokio::test]
async fn test_writer_failure_fails_run() {
    let agent = ScriptedAgent::sequence(&["R1", "unused"]).failing_on(2);

    let result = run_research(agent, Arc::new(NoopRunLogger), "solar power").await;

    let err = result.outcome.unwrap_err();
    assert_eq!(err.step(), "writer");
    assert_eq!(result.prompts.len(), 2);
    assert!(matches!(
        result.events.last(),
        Some(ExecutionEvent::PipelineCompleted { status: ExecutionStatus::Failed, .. })
    ));
}

#[tokio::test]
async fn test_failed_step_is_not_traced() {
    let logger = Arc::new(InMemoryRunLogger::new());
    let agent = ScriptedAgent::sequence(&["R1", "unused"]).failing_on(2);

    let result = run_research(agent, logger.clone(), "solar power").await;

    assert!(result.outcome.is_err());
    let runs = logger.runs().await;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].name, "researcher");
}

#[tokio::test]
async fn test_error_message_names_step_and_cause() {
    let agent = ScriptedAgent::sequence(&[]).failing_on(1);

    let result = run_research(agent, Arc::new(NoopRunLogger), "t").await;

    let err = anyhow::Error::from(result.outcome.unwrap_err());
    let rendered = format!("{:#}", err);
    assert!(rendered.contains("Step 'researcher' failed"));
    assert!(rendered.contains("simulated failure"));
}
