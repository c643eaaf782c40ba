//! CLI command definitions

use crate::agent::Provider;
use clap::Args;

/// Run the pipeline
#[derive(Debug, Args, Clone, Default)]
pub struct RunCommand {
    /// Topic to research (overrides the settings file)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Chat-completion provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Don't record runs in the tracing service
    #[arg(long)]
    pub no_trace: bool,

    /// Print the final state as a single JSON line
    #[arg(long)]
    pub compact: bool,
}

/// Show resolved settings
#[derive(Debug, Args, Clone, Default)]
pub struct ConfigCommand {}

/// Provider argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    Groq,
    Openai,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Groq => Provider::Groq,
            ProviderArg::Openai => Provider::OpenAi,
        }
    }
}
