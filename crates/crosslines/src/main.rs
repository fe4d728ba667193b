//! Crosslines - unified CLI
//!
//! Hot-seat play on the terminal, or two synchronised peers dueling over
//! in-process channels.

#![warn(missing_docs)]

mod cli;
mod duel;
mod play;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use crosslines_rules::RulesConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { rules } => {
            let config = rules.load()?;
            init_tracing(&config);
            play::run(config).await
        }
        Command::Duel {
            rules,
            seed,
            max_moves,
        } => {
            let config = rules.load()?;
            init_tracing(&config);
            run_duel(config, seed.unwrap_or_else(rand::random), max_moves).await
        }
    }
}

/// Logs go to stderr so they never interleave with the board on stdout.
fn init_tracing(config: &RulesConfig) {
    let default = if *config.debug_logging() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run a duel and print both peers' final view
async fn run_duel(config: RulesConfig, seed: u64, max_moves: usize) -> Result<()> {
    let (host, guest) = duel::run(config, seed, max_moves).await?;

    for report in [&host, &guest] {
        println!("[{}] {} moves", report.name, report.moves);
        print!("{}", report.board);
    }
    match host.outcome {
        Some(outcome) => println!("{}", outcome),
        None => println!("Stopped after {} moves without a winner", host.moves),
    }
    println!("Peers agree (seed {})", seed);
    info!(seed, "Duel complete");
    Ok(())
}
