//! Segment-count invariant: one segment per edge of each line.

use super::super::board::Board;
use super::Invariant;
use strum::IntoEnumIterator;

use crate::types::Player;

/// Invariant: `segments.len() == Σ (len(path) − 1)` over non-empty lines.
///
/// Every committed move adds exactly one point to one line and one segment.
pub struct SegmentCountInvariant;

impl Invariant<Board> for SegmentCountInvariant {
    fn holds(board: &Board) -> bool {
        let edges: usize = Player::iter()
            .map(|player| board.path(player).len().saturating_sub(1))
            .sum();
        edges == board.segments().len()
    }

    fn description() -> &'static str {
        "Segment count matches the number of line edges"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn test_moves_hold() {
        let mut board = Board::new(5);
        board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3));
        board.draw(Player::P2, Point::new(2, 0), Point::new(2, 1));
        board.draw(Player::P2, Point::new(2, 0), Point::new(1, 0));
        assert!(SegmentCountInvariant::holds(&board));
        assert_eq!(board.segments().len(), 3);
    }
}
