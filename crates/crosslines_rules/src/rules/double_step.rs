//! The one-time straight two-cell forward move.

use super::super::board::Board;
use super::super::config::RulesConfig;
use super::super::types::{Player, Point};

/// Checks whether the player may still use the double-step.
///
/// False once consumed; otherwise true only for players the configuration
/// grants the privilege to.
pub fn double_step_eligible(player: Player, board: &Board, config: &RulesConfig) -> bool {
    !board.double_step_used(player) && config.double_step().grants(player)
}

/// Checks whether `to` is exactly two cells straight forward of `from`.
///
/// Diagonal double-steps never qualify.
pub fn is_double_step_move(from: Point, to: Point, player: Player, board: &Board) -> bool {
    to == from.offset(0, 2 * board.forward_dir(player))
}

/// The double-step destination and the point it passes over.
///
/// Returns `None` when the destination is off the board.
pub fn double_step_target(from: Point, player: Player, board: &Board) -> Option<(Point, Point)> {
    let dir = board.forward_dir(player);
    let mid = from.offset(0, dir);
    let two = from.offset(0, 2 * dir);
    board.contains(two).then_some((two, mid))
}
