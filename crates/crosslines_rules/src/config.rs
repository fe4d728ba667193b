//! Rule configuration, loadable from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use super::types::Player;

/// Which players hold the one-time double-step privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleStepGrant {
    /// Granted to [`Player::P1`].
    #[serde(default)]
    pub first: bool,
    /// Granted to [`Player::P2`].
    #[serde(default = "default_true")]
    pub second: bool,
}

impl DoubleStepGrant {
    /// Checks whether the player is granted the privilege.
    pub fn grants(&self, player: Player) -> bool {
        match player {
            Player::P1 => self.first,
            Player::P2 => self.second,
        }
    }
}

impl Default for DoubleStepGrant {
    /// The second player only, offsetting the first-move advantage.
    fn default() -> Self {
        Self {
            first: false,
            second: true,
        }
    }
}

/// Rule toggles read by the rule evaluator on every query.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(borrow_self, prefix = "set_")]
pub struct RulesConfig {
    /// Side length of the grid. Fixed for the lifetime of a session.
    #[serde(default = "default_board_size")]
    #[setters(skip)]
    board_size: i32,

    /// Allow one-cell diagonal steps.
    #[serde(default)]
    allow_diagonals: bool,

    /// Reject moves that cross or overlap an existing line.
    #[serde(default = "default_true")]
    forbid_crossing: bool,

    /// Reject moves onto any point already used by a line.
    #[serde(default = "default_true")]
    forbid_point_reuse: bool,

    /// Offer hint points to the UI.
    #[serde(default = "default_true")]
    show_hints: bool,

    /// Log rejection reasons at warn level.
    #[serde(default)]
    debug_logging: bool,

    /// Double-step privilege holders.
    #[serde(default)]
    double_step: DoubleStepGrant,
}

/// Grid sizes a session accepts.
pub const BOARD_SIZES: RangeInclusive<i32> = 2..=26;

fn default_board_size() -> i32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::with_board_size(default_board_size())
    }
}

impl RulesConfig {
    /// Default rules on a `size`×`size` grid, clamped into [`BOARD_SIZES`].
    #[instrument]
    pub fn with_board_size(size: i32) -> Self {
        let board_size = size.clamp(*BOARD_SIZES.start(), *BOARD_SIZES.end());
        if board_size != size {
            warn!(requested = size, board_size, "Board size out of range, clamped");
        }
        Self {
            board_size,
            allow_diagonals: false,
            forbid_crossing: true,
            forbid_point_reuse: true,
            show_hints: true,
            debug_logging: false,
            double_step: DoubleStepGrant::default(),
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading rules config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("cannot read rules file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(board_size = config.board_size, "Rules config loaded");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("malformed rules TOML: {}", e)))?;
        if !BOARD_SIZES.contains(&config.board_size) {
            return Err(ConfigError::new(format!(
                "board_size must lie in {:?}, got {}",
                BOARD_SIZES, config.board_size
            )));
        }
        Ok(config)
    }
}

/// A rules file that could not be used, tagged with the call site that
/// rejected it.
#[derive(Debug, Clone, Display, Error)]
#[display("{} (raised at {}:{})", message, file, line)]
pub struct ConfigError {
    /// What was wrong with the file.
    pub message: String,
    /// Source file of the rejecting call.
    pub file: &'static str,
    /// Source line of the rejecting call.
    pub line: u32,
}

impl ConfigError {
    /// Wraps `message` with the caller's location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            file: caller.file(),
            line: caller.line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert_eq!(*config.board_size(), 5);
        assert!(!config.allow_diagonals());
        assert!(*config.forbid_crossing());
        assert!(*config.forbid_point_reuse());
        assert!(config.double_step().grants(Player::P2));
        assert!(!config.double_step().grants(Player::P1));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RulesConfig::from_toml("allow_diagonals = true\n").unwrap();
        assert!(*config.allow_diagonals());
        assert!(*config.forbid_point_reuse());
        assert_eq!(*config.board_size(), 5);
    }

    #[test]
    fn test_double_step_table() {
        let config = RulesConfig::from_toml("[double_step]\nfirst = true\n").unwrap();
        assert!(config.double_step().grants(Player::P1));
        assert!(config.double_step().grants(Player::P2));
    }

    #[test]
    fn test_rejects_tiny_board() {
        let err = RulesConfig::from_toml("board_size = 1").unwrap_err();
        assert!(err.message.contains("board_size"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_with_board_size_clamps() {
        assert_eq!(*RulesConfig::with_board_size(1).board_size(), 2);
        assert_eq!(*RulesConfig::with_board_size(-4).board_size(), 2);
        assert_eq!(*RulesConfig::with_board_size(40).board_size(), 26);
        assert_eq!(*RulesConfig::with_board_size(3).board_size(), 3);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "board_size = 3\nforbid_crossing = false").unwrap();
        let config = RulesConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.board_size(), 3);
        assert!(!config.forbid_crossing());
    }

    #[test]
    fn test_setters_borrow() {
        let mut config = RulesConfig::default();
        config.set_allow_diagonals(true).set_show_hints(false);
        assert!(*config.allow_diagonals());
        assert!(!config.show_hints());
    }
}
