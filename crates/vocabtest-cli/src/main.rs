//! vocabtest CLI — drill vocabulary from the terminal.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Command, Console, Context};

#[derive(Parser)]
#[command(name = "vocabtest", version, about = "Vocabulary drilling with spaced categories")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding vocab sets and progress (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Command to run; starts the interactive shell when omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = Context::open(cli.config.as_deref(), cli.data_dir)?;
    let mut console = Console::stdin();

    match cli.command {
        Some(command) => commands::dispatch(&mut ctx, &mut console, command).await,
        None => commands::shell::run(&mut ctx, &mut console).await,
    }
}
