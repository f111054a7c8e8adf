//! byoa - a tool-using conversational agent for the terminal.
//!
//! Usage:
//!   byoa                       Chat using settings from the environment
//!   byoa --workdir ../project  Point the file and shell tools elsewhere
//!   byoa --log-level debug     Verbose diagnostics on stderr

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use byoa::config::Config;
use byoa::console::Console;
use byoa::llm::agent::{Agent, StdinInput};
use byoa::llm::claude::ClaudeClient;
use byoa::llm::observe::{Fanout, Observer, TracingObserver};
use byoa::llm::tools::{default_registry, Dispatcher};
use byoa::llm::GenerationConfig;

#[derive(Parser, Debug)]
#[command(name = "byoa")]
#[command(version)]
#[command(about = "Chat with Claude while it reads, searches, edits and runs things in your project")]
struct Cli {
    /// Model identifier (overrides ANTHROPIC_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Maximum tokens per response (overrides BYOA_MAX_TOKENS).
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Model requests allowed per user turn (overrides BYOA_MAX_ITERATIONS).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_iterations: Option<u64>,

    /// Directory the tools operate in (overrides BYOA_WORKDIR).
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// System prompt (overrides BYOA_SYSTEM_PROMPT).
    #[arg(long)]
    system: Option<String>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = usize::try_from(max_iterations).unwrap_or(usize::MAX);
        }
        if let Some(workdir) = self.workdir {
            config.workdir = workdir;
        }
        if let Some(system) = self.system {
            config.system_prompt = Some(system);
        }
        config
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout belongs to the conversation
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = cli.apply(Config::from_env().context("Failed to load configuration")?);
    tracing::info!(
        model = %config.model,
        workdir = %config.workdir.display(),
        max_iterations = config.max_iterations,
        "starting agent"
    );

    let provider = ClaudeClient::new(&config.api_key, &config.base_url)
        .context("Failed to create Claude client")?;

    let observers: Vec<Arc<dyn Observer>> =
        vec![Arc::new(TracingObserver), Arc::new(Console::stdout())];
    let observer: Arc<dyn Observer> = Arc::new(Fanout(observers));

    let registry = Arc::new(default_registry(config.workdir.clone()).context("Failed to register tools")?);
    let declarations = registry.declarations();
    let dispatcher = Dispatcher::new(registry, Arc::clone(&observer));

    let mut agent = Agent::new(
        Box::new(provider),
        Box::new(dispatcher),
        declarations,
        GenerationConfig::new(config.model, config.max_tokens),
        config.system_prompt,
    )
    .with_max_iterations(config.max_iterations)
    .with_observer(observer);

    println!("Chat with Claude (use 'ctrl-c' to quit)");
    agent
        .run(&mut StdinInput::new())
        .await
        .context("Agent loop failed")?;

    Ok(())
}
