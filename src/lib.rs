//! quill - a research-then-write pipeline over chat-completion APIs

pub mod agent;
pub mod cli;
pub mod core;
pub mod execution;
pub mod run_log;
pub mod steps;

// Re-export commonly used types
pub use crate::agent::{AgentClientConfig, AgentError, AgentExecutor, AgentResponse, ChatAgentClient, Provider};
pub use crate::core::{FnStep, Pipeline, PipelineState, StateField, StateUpdate, Step, StepError};
pub use crate::execution::{ExecutionEngine, ExecutionError, ExecutionEvent, ExecutionStatus};
pub use crate::run_log::{RunLogOutcome, RunLogger, RunRecord};
pub use crate::steps::research_pipeline;
