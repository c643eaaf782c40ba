//! Test utilities: scripted agents and loggers

use async_trait::async_trait;
use quill::agent::{AgentError, AgentExecutor, AgentResponse};
use quill::core::PipelineState;
use quill::execution::{ExecutionEngine, ExecutionError, ExecutionEvent};
use quill::run_log::{RunLogError, RunLogger, RunRecord};
use quill::steps::research_pipeline;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// How a scripted agent picks its reply
enum Script {
    /// Replies in order, one per call
    Sequence(Vec<String>),
    /// First reply whose prefix matches the prompt
    ByPrefix(Vec<(String, String)>),
}

/// Mock agent with predefined responses that records every prompt
pub struct ScriptedAgent {
    script: Script,
    prompts: Arc<Mutex<Vec<String>>>,
    fail_on_call: Option<usize>,
}

impl ScriptedAgent {
    pub fn sequence(responses: &[&str]) -> Self {
        Self::from_script(Script::Sequence(
            responses.iter().map(|r| r.to_string()).collect(),
        ))
    }

    pub fn by_prefix(rules: &[(&str, &str)]) -> Self {
        Self::from_script(Script::ByPrefix(
            rules
                .iter()
                .map(|(p, r)| (p.to_string(), r.to_string()))
                .collect(),
        ))
    }

    fn from_script(script: Script) -> Self {
        Self {
            script,
            prompts: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: None,
        }
    }

    /// Fail with a transport error on the given call (1-based)
    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Shared handle on the prompts received so far
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl AgentExecutor for ScriptedAgent {
    async fn execute(&self, prompt: &str) -> Result<AgentResponse, AgentError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(AgentError::Transport(format!(
                "ScriptedAgent: simulated failure on call {}",
                call
            )));
        }

        let reply = match &self.script {
            Script::Sequence(responses) => responses.get(call - 1).cloned(),
            Script::ByPrefix(rules) => rules
                .iter()
                .find(|(prefix, _)| prompt.starts_with(prefix.as_str()))
                .map(|(_, reply)| reply.clone()),
        };

        reply.map(AgentResponse::new).ok_or_else(|| {
            AgentError::MalformedResponse(format!(
                "ScriptedAgent: no response for request {}. Prompt: {}",
                call, prompt
            ))
        })
    }
}

/// Run logger that rejects every run
#[derive(Default)]
pub struct FailingRunLogger {
    attempts: AtomicUsize,
}

impl FailingRunLogger {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RunLogger for FailingRunLogger {
    async fn record_run(&self, _run: &RunRecord) -> Result<(), RunLogError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(RunLogError::Rejected {
            status: 401,
            message: "invalid x-api-key".to_string(),
        })
    }
}

/// Result of a scenario run
pub struct ScenarioResult {
    pub outcome: Result<PipelineState, ExecutionError>,
    pub prompts: Vec<String>,
    pub events: Vec<ExecutionEvent>,
}

/// Run the research pipeline for a topic with the given agent and logger
pub async fn run_research(
    agent: ScriptedAgent,
    run_logger: Arc<dyn RunLogger>,
    topic: &str,
) -> ScenarioResult {
    let prompts = agent.prompts();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let pipeline = research_pipeline(Arc::new(agent)).expect("pipeline builds");
    let engine = ExecutionEngine::new(run_logger)
        .with_event_handler(move |event| sink.lock().unwrap().push(event.clone()));

    let outcome = engine.execute(&pipeline, PipelineState::new(topic)).await;

    let prompts = prompts.lock().unwrap().clone();
    let events = events.lock().unwrap().clone();
    ScenarioResult {
        outcome,
        prompts,
        events,
    }
}

/// Names of the steps that were started, in order
pub fn started_steps(events: &[ExecutionEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ExecutionEvent::StepStarted { step_name, .. } => Some(step_name.clone()),
            _ => None,
        })
        .collect()
}
