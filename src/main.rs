use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod board;
mod cli;
mod config;
mod error;
mod journal;
mod snapshot;
mod tui;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("teamboard=debug")
    } else {
        EnvFilter::new("teamboard=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Tui(args) => cli::tui::execute(args),
        Commands::Check(args) => cli::check::execute(args),
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
