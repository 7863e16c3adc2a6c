//! Prompt Library CLI
//!
//! Main entry point for the promptlib command-line tool.
//! Manages the prompt library directly, or serves it to a UI over a
//! line-based bridge.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AddCommand, BridgeCommand, DeleteCommand, GetCommand, ListCommand, UpdateCommand};
use promptlib_core::{config::AppConfig, logging, AppResult};
use promptlib_prompt::PromptStore;
use std::path::PathBuf;

/// Prompt Library CLI - manage reusable prompt snippets
#[derive(Parser, Debug)]
#[command(name = "promptlib")]
#[command(about = "Manage a library of reusable prompts", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PROMPTLIB_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PROMPTLIB_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the prompt document (default: .promptlib/prompt.json)
    #[arg(short, long, global = true, env = "PROMPTLIB_FILE")]
    file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List prompts, newest first
    List(ListCommand),

    /// Show a single prompt
    Get(GetCommand),

    /// Add a new prompt
    Add(AddCommand),

    /// Update fields of an existing prompt
    Update(UpdateCommand),

    /// Delete a prompt
    Delete(DeleteCommand),

    /// Serve `<type>:<content>` requests from stdin, write UI calls to stdout
    Bridge(BridgeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.file,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Prompt library CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Prompt file: {:?}", config.prompt_file_path());

    let command_name = match &cli.command {
        Commands::List(_) => "list",
        Commands::Get(_) => "get",
        Commands::Add(_) => "add",
        Commands::Update(_) => "update",
        Commands::Delete(_) => "delete",
        Commands::Bridge(_) => "bridge",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let store = PromptStore::from_config(&config);

    let result = match cli.command {
        Commands::List(cmd) => cmd.execute(&store),
        Commands::Get(cmd) => cmd.execute(&store),
        Commands::Add(cmd) => cmd.execute(&store),
        Commands::Update(cmd) => cmd.execute(&store),
        Commands::Delete(cmd) => cmd.execute(&store),
        Commands::Bridge(cmd) => cmd.execute(&config, store).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
