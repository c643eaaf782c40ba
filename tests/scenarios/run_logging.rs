//! Test: run logging is best-effort

use crate::helpers::*;
use pretty_assertions::assert_eq;
use quill::execution::ExecutionEvent;
use quill::run_log::{InMemoryRunLogger, RunLogOutcome};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_failing_logger_does_not_affect_result() {
    let logger = Arc::new(FailingRunLogger::default());
    let agent = ScriptedAgent::sequence(&["R1", "D1"]);

    let result = run_research(agent, logger.clone(), "solar power").await;

    let state = result.outcome.unwrap();
    assert_eq!(state.research, "R1");
    assert_eq!(state.draft, "D1");
    assert_eq!(logger.attempts(), 2);

    let failures = result
        .events
        .iter()
        .filter(|e| matches!(e, ExecutionEvent::StepCompleted { run_log: RunLogOutcome::Failed(_), .. }))
        .count();
    assert_eq!(failures, 2);
}

#[tokio::test]
async fn test_each_step_recorded_with_snapshots() {
    let logger = Arc::new(InMemoryRunLogger::new());
    let agent = ScriptedAgent::sequence(&["R1", "D1"]);

    let result = run_research(agent, logger.clone(), "solar power").await;
    assert!(result.outcome.is_ok());

    let runs = logger.runs().await;
    assert_eq!(runs.len(), 2);

    assert_eq!(runs[0].name, "researcher");
    assert_eq!(runs[0].inputs, json!({"topic": "solar power", "research": "", "draft": ""}));
    assert_eq!(runs[0].outputs, json!({"research": "R1"}));

    assert_eq!(runs[1].name, "writer");
    assert_eq!(runs[1].inputs, json!({"topic": "solar power", "research": "R1", "draft": ""}));
    assert_eq!(runs[1].outputs, json!({"draft": "D1"}));

    // Both runs belong to the same execution
    assert_eq!(runs[0].execution_id, runs[1].execution_id);
    assert_ne!(runs[0].id, runs[1].id);
    assert!(runs.iter().all(|r| r.run_type == "chain"));
}
