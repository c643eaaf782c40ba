//! Test: partial updates merge into the running state

use pretty_assertions::assert_eq;
use quill::core::{FnStep, Pipeline, PipelineState, StateError, StateField, StateUpdate, StepError};
use quill::execution::{ExecutionEngine, ExecutionError};

#[tokio::test]
async fn test_disjoint_writes_leave_topic_untouched() {
    let pipeline = Pipeline::new("merge")
        .with_step(FnStep::new("research", |_: &PipelineState| Ok(StateUpdate::research("notes"))))
        .and_then(|p| p.with_step(FnStep::new("draft", |_: &PipelineState| Ok(StateUpdate::draft("text")))))
        .unwrap();

    let state = ExecutionEngine::without_run_log()
        .execute(&pipeline, PipelineState::new("tidal energy"))
        .await
        .unwrap();

    assert_eq!(state.topic, "tidal energy");
    assert_eq!(state.research, "notes");
    assert_eq!(state.draft, "text");
}

#[tokio::test]
async fn test_later_step_sees_earlier_update() {
    let pipeline = Pipeline::new("chain")
        .with_step(FnStep::new("first", |_: &PipelineState| Ok(StateUpdate::research("from first"))))
        .and_then(|p| {
            p.with_step(FnStep::new("second", |s: &PipelineState| {
                Ok(StateUpdate::draft(format!("saw: {}", s.research)))
            }))
        })
        .unwrap();

    let state = ExecutionEngine::without_run_log()
        .execute(&pipeline, PipelineState::new("t"))
        .await
        .unwrap();

    assert_eq!(state.draft, "saw: from first");
}

#[tokio::test]
async fn test_any_step_may_overwrite_any_field() {
    let pipeline = Pipeline::new("overwrite")
        .with_step(FnStep::new("retitle", |_: &PipelineState| {
            Ok(StateUpdate::from_pairs([("topic", "renamed"), ("research", "r")])?)
        }))
        .unwrap();

    let state = ExecutionEngine::without_run_log()
        .execute(&pipeline, PipelineState::new("original"))
        .await
        .unwrap();

    assert_eq!(state.topic, "renamed");
    assert_eq!(state.research, "r");
    assert_eq!(state.draft, "");
}

#[tokio::test]
async fn test_invalid_update_fails_the_step() {
    let pipeline = Pipeline::new("invalid")
        .with_step(FnStep::new("typo", |_: &PipelineState| {
            Ok(StateUpdate::from_pairs([("summary", "x")])?)
        }))
        .unwrap();

    let err = ExecutionEngine::without_run_log()
        .execute(&pipeline, PipelineState::new("t"))
        .await
        .unwrap_err();

    assert_eq!(err.step(), "typo");
    assert!(matches!(
        err,
        ExecutionError::StepFailed { source: StepError::State(StateError::UnknownField(_)), .. }
    ));
}

#[test]
fn test_unknown_field_rejected_in_update() {
    let err = StateUpdate::from_pairs([("summary", "x")]).unwrap_err();
    assert!(err.to_string().contains("summary"));
    assert_eq!(
        StateUpdate::from_pairs([("draft", "x")]).unwrap().fields(),
        vec![StateField::Draft]
    );
}
