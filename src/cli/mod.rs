//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ConfigCommand, RunCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Research a topic, then draft an article about it
#[derive(Debug, Parser, Clone)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Research a topic with an LLM, then draft an article from the research", long_about = None)]
pub struct Cli {
    /// Command to run (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a YAML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the research-then-write pipeline once
    Run(RunCommand),

    /// Show the resolved settings with credentials masked
    Config(ConfigCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// The command to execute, `run` with defaults when none was given
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Run(RunCommand::default()))
    }
}
