//! Test: the researcher → writer chain

use crate::helpers::*;
use pretty_assertions::assert_eq;
use quill::core::PipelineState;
use quill::run_log::NoopRunLogger;
use std::sync::Arc;

#[tokio::test]
async fn test_fixed_responses_yield_expected_state() {
    let agent = ScriptedAgent::by_prefix(&[
        ("Research the topic:", "R1"),
        ("Write a concise article draft", "D1"),
    ]);

    let result = run_research(agent, Arc::new(NoopRunLogger), "solar power").await;

    assert_eq!(
        result.outcome.unwrap(),
        PipelineState {
            topic: "solar power".to_string(),
            research: "R1".to_string(),
            draft: "D1".to_string(),
        }
    );
}

#[tokio::test]
async fn test_agent_called_twice_in_order() {
    let agent = ScriptedAgent::sequence(&["Solar output doubled.", "Article text."]);

    let result = run_research(agent, Arc::new(NoopRunLogger), "solar power").await;

    assert!(result.outcome.is_ok());
    assert_eq!(
        result.prompts,
        vec![
            "Research the topic: solar power in 3 sentences.".to_string(),
            "Write a concise article draft based on this research:\nSolar output doubled.".to_string(),
        ]
    );
    assert_eq!(started_steps(&result.events), vec!["researcher", "writer"]);
}

#[tokio::test]
async fn test_writer_prompt_contains_research_output() {
    let research = "Line one.\n\nLine two with “quotes” and ünïcödé.";
    let agent = ScriptedAgent::sequence(&[research, "draft"]);

    let result = run_research(agent, Arc::new(NoopRunLogger), "wind").await;

    let state = result.outcome.unwrap();
    assert_eq!(state.research, research);
    assert!(result.prompts[1].contains(research));
}

#[tokio::test]
async fn test_empty_responses_accepted_as_is() {
    let agent = ScriptedAgent::sequence(&["", ""]);

    let result = run_research(agent, Arc::new(NoopRunLogger), "biomass").await;

    let state = result.outcome.unwrap();
    assert_eq!(state.research, "");
    assert_eq!(state.draft, "");
    assert_eq!(result.prompts.len(), 2);
}
