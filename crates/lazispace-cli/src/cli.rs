//! CLI structure and command definitions.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lazispace-log")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Emit entries through the lazispace logger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show logger construction diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap, configure and emit one entry
    Emit(EmitArgs),

    /// Validate a configuration file by building a logger from it
    Check {
        /// YAML configuration file
        config: PathBuf,
    },
}

/// Options shared by configuration-consuming commands.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// YAML configuration file (settings may sit under a `log:` key)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum level: debug, info, warn, error
    #[arg(short, long)]
    pub level: Option<String>,

    /// Output format: text or json
    #[arg(short, long)]
    pub format: Option<String>,

    /// Also write to this log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not write to stdout
    #[arg(long)]
    pub no_console: bool,
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Severity of the entry: debug, info, warn, error or fatal
    pub severity: String,

    /// Message text
    pub message: String,

    /// Fields as key=value
    pub fields: Vec<String>,
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Emit(args) => emit::execute(args),
            Commands::Check { config } => check::execute(config),
        }
    }
}
