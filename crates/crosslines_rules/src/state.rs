//! Complete game state and the phases derived from it.

use super::board::Board;
use super::types::{Outcome, Player, Point};

/// Interaction phase, derived from the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The player has no line yet and nothing is selected.
    AwaitingFirstMove(Player),
    /// The player has a line and must pick one of its ends.
    AwaitingEndpointSelection(Player),
    /// An origin is selected; the player must pick a destination.
    AwaitingDestination(Player, Point),
    /// The game is over.
    GameOver(Outcome),
}

/// Complete game state; a history snapshot is a clone of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// The board.
    pub(crate) board: Board,
    /// Player to move.
    pub(crate) current_player: Player,
    /// Tentatively chosen origin.
    pub(crate) selected: Option<Point>,
    /// Set once the game is decided.
    pub(crate) outcome: Option<Outcome>,
}

impl GameState {
    /// Creates a new game on an empty `size`×`size` board.
    pub fn new(size: i32) -> Self {
        Self {
            board: Board::new(size),
            current_player: Player::P1,
            selected: None,
            outcome: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the selected origin, if any.
    pub fn selected(&self) -> Option<Point> {
        self.selected
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        let player = self.current_player;
        match (self.outcome, self.selected) {
            (Some(outcome), _) => Phase::GameOver(outcome),
            (None, Some(point)) => Phase::AwaitingDestination(player, point),
            (None, None) if self.board.is_first_move(player) => Phase::AwaitingFirstMove(player),
            (None, None) => Phase::AwaitingEndpointSelection(player),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_awaits_first_move() {
        let state = GameState::new(5);
        assert_eq!(state.phase(), Phase::AwaitingFirstMove(Player::P1));
    }

    #[test]
    fn test_phase_after_selection_and_outcome() {
        let mut state = GameState::new(5);
        state.selected = Some(Point::new(2, 4));
        assert_eq!(
            state.phase(),
            Phase::AwaitingDestination(Player::P1, Point::new(2, 4))
        );

        state.board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3));
        state.selected = None;
        assert_eq!(state.phase(), Phase::AwaitingEndpointSelection(Player::P1));

        state.outcome = Some(Outcome::ReachedGoal(Player::P1));
        assert!(matches!(state.phase(), Phase::GameOver(_)));
    }
}
