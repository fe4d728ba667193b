//! First-class action types for crosslines.
//!
//! Moves are domain events, not side effects. They represent the player's
//! intent and can be validated independently of execution.

use super::rules::IllegalReason;
use super::types::{Outcome, Player, Point};
use serde::{Deserialize, Serialize};

/// A move: a player drawing a line from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// Origin: a start-edge point or an end of the player's line.
    pub from: Point,
    /// Destination.
    pub to: Point,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.player, self.from, self.to)
    }
}

/// Where a move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrigin {
    /// Local input; observers are notified.
    Local,
    /// Replayed from a peer message; observers stay silent.
    Remote,
}

/// Event handed to the move observer after a local commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveCommitted {
    /// Origin of the drawn line.
    pub from: Point,
    /// Destination of the drawn line.
    pub to: Point,
    /// Mover.
    pub player: Player,
    /// Whether the move consumed the double-step privilege.
    pub is_double_step: bool,
}

/// Result of a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Game continues with the given player to move.
    Continue(Player),
    /// Game ended.
    Finished(Outcome),
}

impl Transition {
    /// Returns the winner if the move ended the game.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Transition::Continue(_) => None,
            Transition::Finished(outcome) => Some(outcome.winner()),
        }
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// It's not this player's turn.
    #[display("It's {}'s turn, not {}'s", expected, got)]
    WrongPlayer {
        /// Player to move.
        expected: Player,
        /// Player who tried to move.
        got: Player,
    },

    /// First move from outside the start edge (or from a used point).
    #[display("{} is not a valid start point", _0)]
    InvalidStartPoint(Point),

    /// Later move from a point that is not an end of the line.
    #[display("{} is not an end of the line", _0)]
    NotEndpoint(Point),

    /// The rule evaluator rejected the move.
    #[display("Illegal move: {}", _0)]
    Illegal(IllegalReason),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
