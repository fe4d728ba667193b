//! Used-point invariant: the used set is exactly the segment endpoints.

use super::super::board::Board;
use super::Invariant;
use std::collections::HashSet;

/// Invariant: the used-point set equals the union of all segment endpoints.
///
/// Shared endpoints collapse, so the set size is not tied to the segment
/// count; only membership is.
pub struct UsedPointsInvariant;

impl Invariant<Board> for UsedPointsInvariant {
    fn holds(board: &Board) -> bool {
        let endpoints: HashSet<_> = board
            .segments()
            .iter()
            .flat_map(|s| [s.a, s.b])
            .collect();
        &endpoints == board.used_points()
    }

    fn description() -> &'static str {
        "Used points equal the union of segment endpoints"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, PlayerPair, Point};

    #[test]
    fn test_shared_endpoints_hold() {
        let mut board = Board::new(5);
        board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3));
        board.draw(Player::P1, Point::new(2, 3), Point::new(2, 2));
        assert_eq!(board.used_points().len(), 3);
        assert!(UsedPointsInvariant::holds(&board));
    }

    #[test]
    fn test_stray_used_point_violates() {
        let board = Board::from_parts(
            5,
            false,
            PlayerPair::default(),
            [Point::new(1, 1)],
            Vec::new(),
            PlayerPair::default(),
        );
        assert!(!UsedPointsInvariant::holds(&board));
    }
}
