//! Run settings layered from defaults, an optional YAML file and the environment
//!
//! Sources, later wins:
//! 1. Built-in defaults
//! 2. The YAML file passed with `--config`
//! 3. `QUILL_PROVIDER`, `QUILL_MODEL`, `LANGSMITH_ENDPOINT`, `LANGSMITH_PROJECT`
//!
//! Credentials are read from the environment only.

use crate::agent::{AgentClientConfig, Provider};
use crate::run_log::LangSmithConfig;
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Topic used when none is configured
pub const DEFAULT_TOPIC: &str = "Impact of renewable energy in India";

/// Environment variables layered over the file, with the key each one sets
const OVERRIDE_VARS: [(&str, &str); 4] = [
    ("QUILL_PROVIDER", "provider"),
    ("QUILL_MODEL", "model"),
    ("LANGSMITH_ENDPOINT", "tracing.endpoint"),
    ("LANGSMITH_PROJECT", "tracing.project"),
];

/// Environment variables holding API keys
const CREDENTIAL_VARS: [&str; 4] = [
    "GROQ_API_KEY",
    "OPENAI_API_KEY",
    "LANGCHAIN_HANDLER_API_KEY",
    "LANGSMITH_API_KEY",
];

/// Layered settings in the shape of the YAML file
///
/// Credentials are absent; a file naming one is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, deserialize_with = "non_empty")]
    pub topic: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub provider: Option<Provider>,

    #[serde(default, deserialize_with = "non_empty")]
    pub model: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub base_url: Option<String>,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub tracing: Option<TracingFileConfig>,
}

/// `tracing:` section of the settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TracingFileConfig {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default, deserialize_with = "non_empty")]
    pub endpoint: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub project: Option<String>,
}

/// API keys found in the environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, deserialize_with = "non_empty")]
    pub groq_api_key: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub openai_api_key: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub langchain_handler_api_key: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub langsmith_api_key: Option<String>,
}

impl Credentials {
    /// Key for the given LLM provider
    pub fn for_provider(&self, provider: Provider) -> Option<String> {
        match provider {
            Provider::Groq => self.groq_api_key.clone(),
            Provider::OpenAi => self.openai_api_key.clone(),
        }
    }

    /// Key for the tracing service, preferring `LANGCHAIN_HANDLER_API_KEY`
    pub fn run_log(&self) -> Option<String> {
        self.langchain_handler_api_key
            .clone()
            .or_else(|| self.langsmith_api_key.clone())
    }
}

/// Blank strings count as unset; anything else must parse
fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub topic: String,
    pub agent: AgentClientConfig,
    pub run_log: LangSmithConfig,
    layers: FileConfig,
    credentials: Credentials,
}

impl Settings {
    /// Resolve settings from an optional file and the process environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
        }
        Self::from_figments(&Self::figment(config_path), &Self::credentials_figment())
    }

    /// Defaults, then the file, then the environment overrides
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let defaults = FileConfig {
            topic: Some(DEFAULT_TOPIC.to_string()),
            ..FileConfig::default()
        };
        let mut figment = Figment::from(Serialized::defaults(defaults));

        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }

        figment.merge(env_layer(&OVERRIDE_VARS.map(|(var, _)| var)).map(|var| {
            OVERRIDE_VARS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(var.as_str()))
                .map(|(_, key)| *key)
                .unwrap_or(var.as_str())
                .to_string()
                .into()
        }))
    }

    /// API keys from the environment
    pub fn credentials_figment() -> Figment {
        Figment::from(env_layer(&CREDENTIAL_VARS).map(|var| var.as_str().to_ascii_lowercase().into()))
    }

    /// Extract both layers and resolve them
    pub fn from_figments(layers: &Figment, credentials: &Figment) -> Result<Self> {
        let layers: FileConfig = layers.extract().context("Invalid settings")?;
        let credentials: Credentials = credentials.extract().context("Invalid credentials")?;
        Ok(Self::resolve(layers, credentials))
    }

    /// Build settings from already-layered values
    pub fn resolve(layers: FileConfig, credentials: Credentials) -> Self {
        let agent = agent_config(&layers, &credentials);

        let tracing = layers.tracing.clone().unwrap_or_default();
        let mut run_log = LangSmithConfig {
            api_key: credentials.run_log(),
            ..LangSmithConfig::default()
        };
        if let Some(endpoint) = tracing.endpoint {
            run_log.endpoint = endpoint;
        }
        if let Some(project) = tracing.project {
            run_log.project = project;
        }
        run_log.enabled = tracing.enabled.unwrap_or(true) && run_log.api_key.is_some();

        Settings {
            topic: layers.topic.clone().unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            agent,
            run_log,
            layers,
            credentials,
        }
    }

    /// Switch provider
    ///
    /// Model, base URL and credential follow the new provider; the other file
    /// and environment layers still apply.
    pub fn switch_provider(&mut self, provider: Provider) {
        if provider == self.agent.provider {
            return;
        }
        self.layers = FileConfig {
            provider: Some(provider),
            model: None,
            base_url: None,
            ..self.layers.clone()
        };
        self.agent = agent_config(&self.layers, &self.credentials);
    }

    /// Settings as JSON with credentials masked
    pub fn to_redacted_json(&self) -> serde_json::Value {
        serde_json::json!({
            "topic": self.topic,
            "provider": self.agent.provider,
            "model": self.agent.model,
            "base_url": self.agent.effective_base_url(),
            "temperature": self.agent.temperature,
            "timeout_secs": self.agent.timeout_secs,
            "api_key": mask(self.agent.api_key.as_deref()),
            "tracing": {
                "enabled": self.run_log.enabled,
                "endpoint": self.run_log.endpoint,
                "project": self.run_log.project,
                "api_key": mask(self.run_log.api_key.as_deref()),
            }
        })
    }
}

/// Environment provider for `vars`, skipping any set to a blank value
fn env_layer(vars: &[&str]) -> Env {
    let present: Vec<String> = Env::raw()
        .only(vars)
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, _)| key.as_str().to_string())
        .collect();
    let present: Vec<&str> = present.iter().map(String::as_str).collect();
    Env::raw().only(&present)
}

fn agent_config(layers: &FileConfig, credentials: &Credentials) -> AgentClientConfig {
    let provider = layers.provider.unwrap_or_default();
    let mut agent = AgentClientConfig::for_provider(provider);
    if let Some(model) = &layers.model {
        agent.model = model.clone();
    }
    agent.api_key = credentials.for_provider(provider);
    agent.base_url = layers.base_url.clone();
    if let Some(temperature) = layers.temperature {
        agent.temperature = Some(temperature);
    }
    if let Some(timeout_secs) = layers.timeout_secs {
        agent.timeout_secs = timeout_secs;
    }
    agent
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        None => "<unset>".to_string(),
        Some(s) if s.chars().count() <= 8 => "****".to_string(),
        Some(s) => {
            let tail: String = s.chars().skip(s.chars().count() - 4).collect();
            format!("****{}", tail)
        }
    }
}
