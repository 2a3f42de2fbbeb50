//! Mini RAG CLI
//!
//! Main entry point for the minirag command-line tool.
//! Serves the question answering page and answers questions from the terminal.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, DocsCommand, ServeCommand};
use minirag_core::config::{AppConfig, Overrides};
use minirag_core::{logging, AppResult};
use std::path::PathBuf;

/// Mini RAG - question answering over a folder of text documents
#[derive(Parser, Debug)]
#[command(name = "minirag")]
#[command(about = "Question answering over a folder of text documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "MINIRAG_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "MINIRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Document folder (default: <workspace>/data)
    #[arg(short, long, global = true, env = "MINIRAG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Retrieval strategy (lexical, embedding, hybrid)
    #[arg(short, long, global = true, env = "MINIRAG_STRATEGY")]
    strategy: Option<String>,

    /// Answer provider (ollama, extractive)
    #[arg(short, long, global = true, env = "MINIRAG_PROVIDER")]
    provider: Option<String>,

    /// Answer model identifier
    #[arg(short, long, global = true, env = "MINIRAG_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the question answering page
    Serve(ServeCommand),

    /// Ask one question and print the evidence and answer
    Ask(AskCommand),

    /// List the loaded documents
    Docs(DocsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let (host, port) = match &cli.command {
        Commands::Serve(cmd) => (cmd.host.clone(), cmd.port),
        _ => (None, None),
    };

    // Workspace and config file pick the YAML, so they are resolved before loading
    let config = AppConfig::load_from(cli.workspace, cli.config)?.with_overrides(Overrides {
        data_dir: cli.data_dir,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
        host,
        port,
        strategy: cli.strategy,
        provider: cli.provider,
        model: cli.model,
    });

    // Initialize logging with final configuration
    logging::init_logging(
        config.log_level.as_deref(),
        config.log_format(),
        config.no_color,
    )?;

    config.validate()?;

    tracing::info!("Mini RAG starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Documents: {:?}", config.data_path());
    tracing::debug!(
        "Strategy: {}, answer provider: {}",
        config.retrieval.strategy,
        config.answer.provider
    );

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Docs(_) => "docs",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Docs(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
