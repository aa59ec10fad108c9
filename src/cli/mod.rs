pub mod check;
pub mod schema;
pub mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "teamboard")]
#[command(
    author,
    version,
    about = "Terminal assignment board for staffing team members onto demands"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive board
    Tui(TuiArgs),

    /// Print a plain-text summary of a snapshot
    Check(CheckArgs),

    /// Print JSON Schema for the snapshot (or config) format
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct TuiArgs {
    /// Board snapshot to open (JSON, or YAML by extension)
    #[arg(short, long, env = "TEAMBOARD_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Path to config file
    #[arg(short, long, default_value = "teamboard.yaml")]
    pub config: PathBuf,

    /// Append applied changes to this JSON-lines file (overrides config)
    #[arg(long)]
    pub journal: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct CheckArgs {
    /// Board snapshot to summarize
    #[arg(short, long, env = "TEAMBOARD_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Only list members whose name contains this text
    #[arg(short, long)]
    pub query: Option<String>,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Print the config file schema instead
    #[arg(long)]
    pub config: bool,
}
