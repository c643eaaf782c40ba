//! Agent response types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for agent operations
///
/// Every variant is fatal to the step that raised it; nothing here is retried.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("No API key configured (set {0})")]
    MissingCredential(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Response from the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The response content
    pub content: String,

    /// Whether the response is complete
    pub done: bool,

    /// Token usage information (if available)
    pub usage: Option<TokenUsage>,
}

impl AgentResponse {
    /// Create a new agent response
    pub fn new(content: String) -> Self {
        Self {
            content,
            done: true,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
