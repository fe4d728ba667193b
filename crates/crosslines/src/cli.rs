//! Command-line interface for crosslines.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crosslines_rules::RulesConfig;
use std::path::PathBuf;

/// Crosslines - two lines, one grid, no crossing
#[derive(Parser, Debug)]
#[command(name = "crosslines")]
#[command(about = "Connection game with a peer-sync protocol", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a hot-seat match on the terminal
    Play {
        /// Rule options
        #[command(flatten)]
        rules: RulesArgs,
    },

    /// Run two synchronised peers against each other with random moves
    Duel {
        /// Rule options
        #[command(flatten)]
        rules: RulesArgs,

        /// Seed for role choice and move selection (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many committed moves
        #[arg(long, default_value = "200")]
        max_moves: usize,
    },
}

/// Rule file and per-run overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct RulesArgs {
    /// Path to a rules TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Allow one-cell diagonal steps
    #[arg(long)]
    pub diagonals: bool,

    /// Allow lines to cross
    #[arg(long)]
    pub allow_crossing: bool,

    /// Allow moving onto used points
    #[arg(long)]
    pub allow_reuse: bool,

    /// Hide hint points
    #[arg(long)]
    pub no_hints: bool,

    /// Log rejected moves at warn level
    #[arg(long)]
    pub debug_logging: bool,
}

impl RulesArgs {
    /// Loads the rules file (or defaults) and applies the flags on top.
    pub fn load(&self) -> Result<RulesConfig> {
        let mut config = match &self.config {
            Some(path) => RulesConfig::from_file(path)
                .with_context(|| format!("loading rules from {}", path.display()))?,
            None => RulesConfig::default(),
        };
        if self.diagonals {
            config.set_allow_diagonals(true);
        }
        if self.allow_crossing {
            config.set_forbid_crossing(false);
        }
        if self.allow_reuse {
            config.set_forbid_point_reuse(false);
        }
        if self.no_hints {
            config.set_show_hints(false);
        }
        if self.debug_logging {
            config.set_debug_logging(true);
        }
        Ok(config)
    }
}
