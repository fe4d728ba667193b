//! Win detection for crosslines.

use super::super::board::Board;
use super::super::types::Player;
use tracing::instrument;

/// Returns `Some(player)` if either end of the player's line sits on their
/// goal edge, `None` otherwise.
#[instrument(level = "debug", skip(board))]
pub fn winner_after(player: Player, board: &Board) -> Option<Player> {
    let (tail, head) = board.ends(player)?;
    (board.is_goal_edge(player, tail) || board.is_goal_edge(player, head)).then_some(player)
}
