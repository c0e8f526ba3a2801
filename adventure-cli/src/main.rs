use std::path::PathBuf;

use adventure::AdventureConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "adventure")]
#[command(about = "Play and inspect branching story files", long_about = None)]
struct Cli {
    /// TOML file with parser options
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AdventureConfig::load(path)?,
        None => AdventureConfig::default(),
    };
    tracing::debug!("Parser options: {:?}", config.parser);
    cli.command.execute(&config)
}
