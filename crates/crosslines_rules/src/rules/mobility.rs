//! Legal destinations, origins and stalemate detection.

use super::super::board::Board;
use super::super::config::RulesConfig;
use super::super::types::{Player, Point};
use super::double_step::{double_step_eligible, double_step_target};
use super::step::{IllegalReason, check_step, neighbors_of};
use tracing::instrument;

/// Shape of a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// One cell in any allowed direction.
    Single,
    /// Two cells straight forward, consuming the privilege.
    Double,
}

/// Checks whether `to` is a legal destination from `from` for `player`.
///
/// A neighbor must pass [`check_step`]. The double-step destination must also
/// be available to the player and, when reuse is forbidden, pass over an
/// unused midpoint.
pub fn check_destination(
    from: Point,
    to: Point,
    player: Player,
    board: &Board,
    config: &RulesConfig,
) -> Result<StepKind, IllegalReason> {
    let size = board.size();
    if neighbors_of(from, *config.allow_diagonals(), size).contains(&to) {
        return check_step(from, to, board, config).map(|()| StepKind::Single);
    }

    if double_step_eligible(player, board, config)
        && let Some((two, mid)) = double_step_target(from, player, board)
        && two == to
    {
        if *config.forbid_point_reuse() && board.is_used(mid) {
            return Err(IllegalReason::MidpointUsed);
        }
        return check_step(from, to, board, config).map(|()| StepKind::Double);
    }

    Err(IllegalReason::NotReachable)
}

/// Every legal destination from `from`, one-cell steps first.
#[instrument(level = "trace", skip(board, config))]
pub fn legal_destinations(
    from: Point,
    player: Player,
    board: &Board,
    config: &RulesConfig,
) -> Vec<Point> {
    let mut list: Vec<Point> = neighbors_of(from, *config.allow_diagonals(), board.size())
        .into_iter()
        .filter(|&to| check_step(from, to, board, config).is_ok())
        .collect();

    if double_step_eligible(player, board, config)
        && let Some((two, _)) = double_step_target(from, player, board)
        && check_destination(from, two, player, board, config).is_ok()
    {
        list.push(two);
    }
    list
}

/// Points the player may move from right now.
///
/// Before the first move: start-edge points (unused ones only when reuse is
/// forbidden). Afterwards: the two ends of the player's line.
pub fn valid_origins(player: Player, board: &Board, config: &RulesConfig) -> Vec<Point> {
    match board.ends(player) {
        Some((tail, head)) => vec![tail, head],
        None => board
            .start_points(player)
            .filter(|&p| !(*config.forbid_point_reuse() && board.is_used(p)))
            .collect(),
    }
}

/// Checks whether the player has at least one legal move.
#[instrument(level = "debug", skip(board, config), ret)]
pub fn has_any_move(player: Player, board: &Board, config: &RulesConfig) -> bool {
    valid_origins(player, board, config)
        .into_iter()
        .any(|from| !legal_destinations(from, player, board, config).is_empty())
}

/// Every `(from, to)` pair the player may play.
pub fn legal_moves(player: Player, board: &Board, config: &RulesConfig) -> Vec<(Point, Point)> {
    valid_origins(player, board, config)
        .into_iter()
        .flat_map(|from| {
            legal_destinations(from, player, board, config)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_first_move_destinations() {
        let board = Board::new(5);
        let config = RulesConfig::default();

        let mut dests = legal_destinations(p(2, 4), Player::P1, &board, &config);
        dests.sort();
        assert_eq!(dests, vec![p(1, 4), p(2, 3), p(3, 4)]);

        // The second player also gets the double-step.
        let dests = legal_destinations(p(2, 0), Player::P2, &board, &config);
        assert!(dests.contains(&p(2, 2)));
        assert_eq!(dests.len(), 4);
    }

    #[test]
    fn test_same_point_is_not_a_destination() {
        let board = Board::new(5);
        let config = RulesConfig::default();
        assert_eq!(
            check_destination(p(2, 4), p(2, 4), Player::P1, &board, &config),
            Err(IllegalReason::NotReachable)
        );
    }

    #[test]
    fn test_double_step_midpoint_blocked() {
        let mut board = Board::new(5);
        board.draw(Player::P1, p(2, 4), p(2, 3));
        board.draw(Player::P1, p(2, 3), p(2, 2));
        board.draw(Player::P1, p(2, 2), p(2, 1));
        let config = RulesConfig::default();

        // P2 starting above the line: (2,1) is used, so (2,0)->(2,2) is out.
        assert_eq!(
            check_destination(p(2, 0), p(2, 2), Player::P2, &board, &config),
            Err(IllegalReason::MidpointUsed)
        );
    }

    #[test]
    fn test_double_step_kind() {
        let board = Board::new(5);
        let config = RulesConfig::default();
        assert_eq!(
            check_destination(p(2, 0), p(2, 2), Player::P2, &board, &config),
            Ok(StepKind::Double)
        );
        assert_eq!(
            check_destination(p(2, 0), p(2, 1), Player::P2, &board, &config),
            Ok(StepKind::Single)
        );
        // No diagonal double-steps.
        assert_eq!(
            check_destination(p(2, 0), p(4, 2), Player::P2, &board, &config),
            Err(IllegalReason::NotReachable)
        );
    }

    #[test]
    fn test_origins() {
        let mut board = Board::new(5);
        let config = RulesConfig::default();
        assert_eq!(valid_origins(Player::P1, &board, &config).len(), 5);

        board.draw(Player::P2, p(0, 0), p(0, 1));
        board.draw(Player::P2, p(0, 1), p(0, 2));
        board.draw(Player::P2, p(0, 2), p(0, 3));
        board.draw(Player::P2, p(0, 3), p(0, 4));
        // (0,4) is on P1's start edge and now used.
        assert_eq!(valid_origins(Player::P1, &board, &config).len(), 4);
        assert_eq!(valid_origins(Player::P2, &board, &config), vec![p(0, 0), p(0, 4)]);
    }

    #[test]
    fn test_legal_moves_on_empty_board() {
        let board = Board::new(5);
        let config = RulesConfig::default();
        assert!(has_any_move(Player::P1, &board, &config));
        // Corners have two exits, the three middle points three each.
        assert_eq!(legal_moves(Player::P1, &board, &config).len(), 2 * 2 + 3 * 3);
    }
}
