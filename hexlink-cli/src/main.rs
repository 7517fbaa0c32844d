//! HEXLINK CLI - Command-line interface
//!
//! Commands:
//! - connect: Play one game against a Hex protocol server
//! - arena: Play local games between two policies

mod arena;
mod connect;
mod human;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexlink")]
#[command(about = "Hex agent for turn-based game servers")]
struct Cli {
    /// Log filter, e.g. "debug" or "hexlink_client=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a game server and play one game
    Connect(connect::ConnectArgs),
    /// Play local games between two policies
    Arena(arena::ArenaArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Connect(args) => connect::run(args, cli.seed),
        Commands::Arena(args) => arena::run(args, cli.seed),
    }
}

/// Logs go to stderr so stdout stays clean for reports and prompts
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
