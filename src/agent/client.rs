//! Agent client configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chat-completion provider
///
/// Both speak the OpenAI-compatible `/chat/completions` wire format; they differ
/// in base URL, credential and default model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Groq => "llama-3.1-8b-instant",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }

    /// Sampling temperature used when none is configured
    pub fn default_temperature(&self) -> Option<f32> {
        match self {
            Provider::Groq => None,
            Provider::OpenAi => Some(0.0),
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Groq => write!(f, "groq"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "openai" | "open-ai" => Ok(Provider::OpenAi),
            other => Err(format!(
                "Unknown provider '{}' (expected 'groq' or 'openai')",
                other
            )),
        }
    }
}

/// Configuration for agent client
#[derive(Debug, Clone)]
pub struct AgentClientConfig {
    pub provider: Provider,

    /// Model identifier sent with every request
    pub model: String,

    /// API key; absence is only reported when the first request is made
    pub api_key: Option<String>,

    /// Overrides the provider's base URL (e.g. a local proxy)
    pub base_url: Option<String>,

    pub temperature: Option<f32>,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self::for_provider(Provider::default())
    }
}

impl AgentClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with the provider's defaults and no credential
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            base_url: None,
            temperature: provider.default_temperature(),
            timeout_secs: 120,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL the requests go to, without a trailing slash
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}
