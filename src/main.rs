use anyhow::{Context, Result};
use quill::agent::ChatAgentClient;
use quill::cli::commands::{ConfigCommand, RunCommand};
use quill::cli::output::{format_final_state, format_final_state_compact, StepSpinner, FINAL_STATE_HEADER};
use quill::cli::{Cli, Command};
use quill::core::config::Settings;
use quill::core::PipelineState;
use quill::execution::ExecutionEngine;
use quill::run_log::{LangSmithRunLogger, NoopRunLogger, RunLogger};
use quill::steps::research_pipeline;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Credentials may live in a .env file next to the working directory
    dotenvy::dotenv().ok();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command() {
        Command::Run(cmd) => run_pipeline(&cmd, &mut settings).await,
        Command::Config(cmd) => show_config(&cmd, &settings),
    }
}

async fn run_pipeline(cmd: &RunCommand, settings: &mut Settings) -> Result<()> {
    if let Some(provider) = cmd.provider {
        settings.switch_provider(provider.into());
    }
    if let Some(model) = &cmd.model {
        settings.agent.model = model.clone();
    }
    if let Some(topic) = &cmd.topic {
        settings.topic = topic.clone();
    }
    if cmd.no_trace {
        settings.run_log.enabled = false;
    }

    info!(
        "Using {} model {} (tracing {})",
        settings.agent.provider,
        settings.agent.model,
        if settings.run_log.enabled { "on" } else { "off" }
    );

    let agent = ChatAgentClient::new(settings.agent.clone()).context("Failed to create LLM client")?;
    let run_logger: Arc<dyn RunLogger> = if settings.run_log.enabled {
        Arc::new(LangSmithRunLogger::new(settings.run_log.clone()).context("Failed to create run logger")?)
    } else {
        Arc::new(NoopRunLogger)
    };

    let pipeline = research_pipeline(Arc::new(agent))?;

    let spinner = StepSpinner::new();
    let engine = ExecutionEngine::new(run_logger).with_event_handler(move |event| {
        if let Some(line) = spinner.handle(event) {
            eprintln!("{}", line);
        }
    });

    let state = engine
        .execute(&pipeline, PipelineState::new(settings.topic.clone()))
        .await
        .context("Pipeline run failed")?;

    if cmd.compact {
        println!("{}", format_final_state_compact(&state)?);
    } else {
        println!("\n{}", FINAL_STATE_HEADER);
        println!("{}", format_final_state(&state)?);
    }

    Ok(())
}

fn show_config(_cmd: &ConfigCommand, settings: &Settings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&settings.to_redacted_json())?);
    Ok(())
}
