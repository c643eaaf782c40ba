//! Chat-completion agent client for executing prompts

pub mod client;
pub mod http_client;
pub mod response;

use async_trait::async_trait;
pub use client::{AgentClientConfig, Provider};
pub use http_client::ChatCompletionsClient;
pub use response::{AgentError, AgentResponse, TokenUsage};

/// Trait for agent execution - allows for different implementations
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Execute a prompt and return the complete response
    async fn execute(&self, prompt: &str) -> Result<AgentResponse, AgentError>;
}

/// Agent client backed by a chat-completion provider
#[derive(Debug, Clone)]
pub struct ChatAgentClient {
    /// The HTTP client that handles the actual request
    http_client: ChatCompletionsClient,
}

impl ChatAgentClient {
    /// Create a new agent client
    ///
    /// The provider is fixed for the lifetime of the client.
    pub fn new(config: AgentClientConfig) -> Result<Self, AgentError> {
        let http_client = ChatCompletionsClient::new(config)?;
        Ok(Self { http_client })
    }

    pub fn config(&self) -> &AgentClientConfig {
        self.http_client.config()
    }
}

#[async_trait]
impl AgentExecutor for ChatAgentClient {
    async fn execute(&self, prompt: &str) -> Result<AgentResponse, AgentError> {
        self.http_client.complete(prompt).await
    }
}
