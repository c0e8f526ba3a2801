use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

use adventure::AdventureConfig;

pub mod check;
pub mod dump;
pub mod play;

/// Output format for `dump`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// Nested JSON outline
    Json,
    /// The story line format, re-serialized
    Lines,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a story file and report its size
    Check {
        /// Story file
        source: PathBuf,
    },

    /// Print a parsed story
    Dump {
        /// Story file
        source: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = DumpFormat::Json)]
        format: DumpFormat,
    },

    /// Play a story in the terminal
    Play {
        /// Story file
        source: PathBuf,
    },
}

impl Commands {
    pub fn execute(&self, config: &AdventureConfig) -> anyhow::Result<()> {
        match self {
            Commands::Check { source } => check::execute(source, &config.parser),
            Commands::Dump { source, format } => dump::execute(source, *format, &config.parser),
            Commands::Play { source } => play::execute(source, &config.parser),
        }
    }
}
