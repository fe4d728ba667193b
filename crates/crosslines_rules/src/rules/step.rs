//! One-step legality: adjacency, point reuse and crossing.

use super::super::board::Board;
use super::super::config::RulesConfig;
use super::super::geometry::proper_intersect;
use super::super::types::Point;
use tracing::instrument;

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Why a candidate move is not legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum IllegalReason {
    /// Point reuse is forbidden and the destination is already used.
    #[display("destination already used")]
    DestinationUsed,

    /// The destination is an endpoint of a line not touching the origin.
    #[display("destination is another line's endpoint")]
    DestinationIsEndpoint,

    /// Crossing is forbidden and the move crosses or overlaps a line.
    #[display("crosses/overlaps an existing line")]
    Crosses,

    /// Point reuse is forbidden and the double-step would pass a used point.
    #[display("double-step midpoint already used")]
    MidpointUsed,

    /// The destination is neither a neighbor nor an available double-step.
    #[display("not an adjacent or double-step destination")]
    NotReachable,
}

impl std::error::Error for IllegalReason {}

/// Points one step from `point`, orthogonally and optionally diagonally.
pub fn neighbors_of(point: Point, allow_diagonals: bool, size: i32) -> Vec<Point> {
    let diagonals: &[(i32, i32)] = if allow_diagonals { &DIAGONAL } else { &[] };
    ORTHOGONAL
        .iter()
        .chain(diagonals)
        .map(|&(dx, dy)| point.offset(dx, dy))
        .filter(|p| p.is_on_board(size))
        .collect()
}

/// Checks whether the segment `from`–`to` may be drawn on `board`.
///
/// Adjacency is not checked here; see
/// [`check_destination`](super::check_destination).
#[instrument(level = "trace", skip(board, config))]
pub fn check_step(
    from: Point,
    to: Point,
    board: &Board,
    config: &RulesConfig,
) -> Result<(), IllegalReason> {
    if *config.forbid_point_reuse() && board.is_used(to) {
        return Err(IllegalReason::DestinationUsed);
    }

    for segment in board.segments() {
        // Continuing a line from its own endpoint is always allowed.
        if segment.has_endpoint(from) {
            continue;
        }
        if segment.has_endpoint(to) {
            return Err(IllegalReason::DestinationIsEndpoint);
        }
        if *config.forbid_crossing() && proper_intersect(from, to, segment.a, segment.b) {
            return Err(IllegalReason::Crosses);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_neighbors_corner() {
        let mut n = neighbors_of(p(0, 0), false, 5);
        n.sort();
        assert_eq!(n, vec![p(0, 1), p(1, 0)]);

        let n = neighbors_of(p(0, 0), true, 5);
        assert_eq!(n.len(), 3);
        assert!(n.contains(&p(1, 1)));
    }

    #[test]
    fn test_neighbors_center() {
        assert_eq!(neighbors_of(p(2, 2), false, 5).len(), 4);
        assert_eq!(neighbors_of(p(2, 2), true, 5).len(), 8);
    }

    #[test]
    fn test_reuse_rule() {
        let mut board = Board::new(5);
        board.draw(Player::P1, p(2, 4), p(2, 3));
        let mut config = RulesConfig::default();

        assert_eq!(
            check_step(p(3, 3), p(2, 3), &board, &config),
            Err(IllegalReason::DestinationUsed)
        );

        // Without the reuse rule the endpoint rule still applies.
        config.set_forbid_point_reuse(false);
        assert_eq!(
            check_step(p(3, 3), p(2, 3), &board, &config),
            Err(IllegalReason::DestinationIsEndpoint)
        );
    }

    #[test]
    fn test_continuing_from_endpoint_is_allowed() {
        let mut board = Board::new(5);
        board.draw(Player::P1, p(2, 4), p(2, 3));
        let config = RulesConfig::default();
        assert_eq!(check_step(p(2, 3), p(2, 2), &board, &config), Ok(()));
    }

    #[test]
    fn test_crossing_toggle() {
        let mut board = Board::new(5);
        board.draw(Player::P1, p(1, 1), p(2, 2));
        let mut config = RulesConfig::default();
        config.set_allow_diagonals(true);

        assert_eq!(
            check_step(p(2, 1), p(1, 2), &board, &config),
            Err(IllegalReason::Crosses)
        );
        assert_eq!(
            IllegalReason::Crosses.to_string(),
            "crosses/overlaps an existing line"
        );

        config.set_forbid_crossing(false);
        assert_eq!(check_step(p(2, 1), p(1, 2), &board, &config), Ok(()));
    }
}
