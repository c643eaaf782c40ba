//! Chat-completions HTTP client - one request/response exchange per prompt

use crate::agent::{AgentClientConfig, AgentError, AgentResponse, TokenUsage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    config: AgentClientConfig,
}

impl ChatCompletionsClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns `AgentError::Transport` if the underlying HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(config: AgentClientConfig) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AgentClientConfig {
        &self.config
    }

    /// Full URL of the completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.effective_base_url())
    }

    /// Send a single user-message completion request
    ///
    /// # Errors
    /// Returns `AgentError` if:
    /// - no API key is configured
    /// - the request cannot be sent or times out
    /// - the API answers with a non-success status
    /// - the body is not a chat-completion response
    pub async fn complete(&self, prompt: &str) -> Result<AgentResponse, AgentError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AgentError::MissingCredential(self.config.provider.api_key_env().to_string())
        })?;

        debug!(
            "Sending completion request to {} (model {}, prompt length {})",
            self.config.provider,
            self.config.model,
            prompt.len()
        );

        let body = build_request(&self.config, prompt);
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let parsed = parse_response(status, &text);
        if let Err(e) = &parsed {
            warn!("{} completion failed: {}", self.config.provider, e);
        }
        parsed
    }

    fn map_transport_error(&self, e: reqwest::Error) -> AgentError {
        if e.is_timeout() {
            AgentError::Timeout(self.config.timeout_secs)
        } else {
            AgentError::Transport(e.to_string())
        }
    }
}

fn build_request<'a>(config: &'a AgentClientConfig, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: config.temperature,
    }
}

/// Turn an HTTP status and body into a response or an error
///
/// A `null` message content is read as an empty string.
fn parse_response(status: u16, body: &str) -> Result<AgentResponse, AgentError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        return Err(AgentError::Api { status, message });
    }

    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AgentError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::MalformedResponse("response contained no choices".to_string()))?;

    let mut response = AgentResponse::new(choice.message.content.unwrap_or_default());
    if let Some(usage) = parsed.usage {
        response = response.with_usage(usage);
    }
    Ok(response)
}
