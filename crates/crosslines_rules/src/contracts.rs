//! Move validation as explicit pre- and postconditions.
//!
//! Preconditions run against the live state and never mutate it; the
//! postcondition compares a candidate state with the one it replaces.

use super::action::{Move, MoveError};
use super::config::RulesConfig;
use super::invariants::{BoardInvariants, InvariantSet, describe};
use super::rules::{StepKind, check_destination, valid_origins};
use super::state::GameState;
use strum::IntoEnumIterator;
use tracing::{instrument, warn};

use crate::types::Player;

// ─────────────────────────────────────────────────────────────
//  Contract
// ─────────────────────────────────────────────────────────────

/// Checks guarding one kind of state transition.
///
/// `pre` decides whether the action may run and reports what it found;
/// `post` inspects the candidate result before it is committed.
pub trait Contract<S, A> {
    /// What the precondition learned about the action.
    type Verdict;

    /// Runs before the action touches any state.
    fn pre(state: &S, config: &RulesConfig, action: &A) -> Result<Self::Verdict, MoveError>;

    /// Runs on the candidate state; an error discards it.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The game must not be over.
pub struct GameInProgress;

impl GameInProgress {
    /// Rejects moves once an outcome is recorded.
    pub fn check(state: &GameState) -> Result<(), MoveError> {
        match state.outcome() {
            Some(_) => Err(MoveError::GameOver),
            None => Ok(()),
        }
    }
}

/// Precondition: the mover is the player on turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Rejects moves by the player not on turn.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        if mov.player != state.current_player() {
            Err(MoveError::WrongPlayer {
                expected: state.current_player(),
                got: mov.player,
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: The origin must be a start point or an end of the line.
pub struct ValidOrigin;

impl ValidOrigin {
    /// Rejects origins the player cannot move from.
    #[instrument(skip(state, config))]
    pub fn check(mov: &Move, state: &GameState, config: &RulesConfig) -> Result<(), MoveError> {
        let board = state.board();
        if valid_origins(mov.player, board, config).contains(&mov.from) {
            Ok(())
        } else if board.is_first_move(mov.player) {
            Err(MoveError::InvalidStartPoint(mov.from))
        } else {
            Err(MoveError::NotEndpoint(mov.from))
        }
    }
}

/// Precondition: The destination must be legal from the origin.
pub struct LegalStep;

impl LegalStep {
    /// Re-derives legality with the rule evaluator.
    #[instrument(skip(state, config))]
    pub fn check(
        mov: &Move,
        state: &GameState,
        config: &RulesConfig,
    ) -> Result<StepKind, MoveError> {
        check_destination(mov.from, mov.to, mov.player, state.board(), config)
            .map_err(MoveError::Illegal)
    }
}

/// Composite precondition for a move proposed on this side.
pub struct LegalMove;

impl LegalMove {
    /// Runs every move precondition and returns the step kind.
    #[instrument(skip(state, config))]
    pub fn check(
        mov: &Move,
        state: &GameState,
        config: &RulesConfig,
    ) -> Result<StepKind, MoveError> {
        GameInProgress::check(state)?;
        PlayersTurn::check(mov, state)?;
        ValidOrigin::check(mov, state, config)?;
        LegalStep::check(mov, state, config)
    }
}

// ─────────────────────────────────────────────────────────────
//  Move contract
// ─────────────────────────────────────────────────────────────

/// Contract for drawing one segment.
///
/// Before: game running, mover on turn, origin valid, destination legal.
/// After: board invariants hold, exactly one new segment, no double-step
/// right handed back.
pub struct MoveContract;

impl Contract<GameState, Move> for MoveContract {
    type Verdict = StepKind;

    fn pre(state: &GameState, config: &RulesConfig, action: &Move) -> Result<StepKind, MoveError> {
        LegalMove::check(action, state, config)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), MoveError> {
        BoardInvariants::check_all(after.board()).map_err(|violations| {
            MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                describe(&violations)
            ))
        })?;

        let added = after.board().segments().len() as i64 - before.board().segments().len() as i64;
        if added != 1 {
            warn!(added, "Move did not add exactly one segment");
            return Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: expected one new segment, got {}",
                added
            )));
        }

        if let Some(player) = Player::iter().find(|&player| {
            before.board().double_step_used(player) && !after.board().double_step_used(player)
        }) {
            warn!(?player, "Double-step right restored");
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: double-step right restored".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::IllegalReason;
    use crate::types::Point;

    fn mv(player: Player, from: (i32, i32), to: (i32, i32)) -> Move {
        Move::new(player, Point::new(from.0, from.1), Point::new(to.0, to.1))
    }

    #[test]
    fn test_precondition_legal_first_move() {
        let state = GameState::new(5);
        let config = RulesConfig::default();
        assert_eq!(
            MoveContract::pre(&state, &config, &mv(Player::P1, (2, 4), (2, 3))),
            Ok(StepKind::Single)
        );
    }

    #[test]
    fn test_precondition_wrong_turn() {
        let state = GameState::new(5);
        let config = RulesConfig::default();
        assert_eq!(
            MoveContract::pre(&state, &config, &mv(Player::P2, (2, 0), (2, 1))),
            Err(MoveError::WrongPlayer {
                expected: Player::P1,
                got: Player::P2
            })
        );
    }

    #[test]
    fn test_precondition_origin_errors() {
        let mut state = GameState::new(5);
        let config = RulesConfig::default();
        assert_eq!(
            MoveContract::pre(&state, &config, &mv(Player::P1, (2, 3), (2, 2))),
            Err(MoveError::InvalidStartPoint(Point::new(2, 3)))
        );

        state.board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3));
        state.board.draw(Player::P1, Point::new(2, 3), Point::new(2, 2));
        assert_eq!(
            MoveContract::pre(&state, &config, &mv(Player::P1, (2, 3), (3, 3))),
            Err(MoveError::NotEndpoint(Point::new(2, 3)))
        );
    }

    #[test]
    fn test_precondition_same_point() {
        let state = GameState::new(5);
        let config = RulesConfig::default();
        assert_eq!(
            MoveContract::pre(&state, &config, &mv(Player::P1, (2, 4), (2, 4))),
            Err(MoveError::Illegal(IllegalReason::NotReachable))
        );
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = GameState::new(5);
        let mut after = before.clone();
        after.board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3));
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_missing_segment() {
        let before = GameState::new(5);
        assert!(matches!(
            MoveContract::post(&before, &before),
            Err(MoveError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_postcondition_detects_restored_right() {
        let mut before = GameState::new(5);
        before.board.consume_double_step(Player::P2);
        let mut after = GameState::new(5);
        after.board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3));
        assert!(MoveContract::post(&before, &after).is_err());
    }
}
