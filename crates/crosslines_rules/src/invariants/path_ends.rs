//! Path-end invariant: both ends of a started line are used points.

use super::super::board::Board;
use super::Invariant;
use strum::IntoEnumIterator;

use crate::types::Player;

/// Invariant: every non-empty line has its first and last points in the
/// used-point set.
pub struct PathEndsUsedInvariant;

impl Invariant<Board> for PathEndsUsedInvariant {
    fn holds(board: &Board) -> bool {
        Player::iter().all(|player| match board.ends(player) {
            Some((tail, head)) => board.is_used(tail) && board.is_used(head),
            None => true,
        })
    }

    fn description() -> &'static str {
        "Both ends of every started line are used points"
    }
}
