//! Board and path model: grid bounds, used points, per-player lines.

use super::types::{Player, PlayerPair, Point, Segment};
use std::collections::HashSet;
use tracing::instrument;

/// Which end of a path a move extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEnd {
    /// The first point of the path.
    Tail,
    /// The last point of the path.
    Head,
}

/// Board position: both players' lines and the bookkeeping derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Side length of the square grid.
    size: i32,
    /// Whether the players' start and goal edges are exchanged.
    swapped: bool,
    /// Ordered points of each player's line.
    paths: PlayerPair<Vec<Point>>,
    /// Every endpoint of every segment.
    used: HashSet<Point>,
    /// One segment per committed move, in commit order.
    segments: Vec<Segment>,
    /// Whether each player has consumed the double-step privilege.
    double_step_used: PlayerPair<bool>,
}

impl Board {
    /// Creates an empty board of `size`×`size` points.
    pub fn new(size: i32) -> Self {
        Self {
            size,
            swapped: false,
            paths: PlayerPair::default(),
            used: HashSet::new(),
            segments: Vec::new(),
            double_step_used: PlayerPair::default(),
        }
    }

    /// Reassembles a board from stored parts, keeping `used` as given.
    pub fn from_parts(
        size: i32,
        swapped: bool,
        paths: PlayerPair<Vec<Point>>,
        used: impl IntoIterator<Item = Point>,
        segments: Vec<Segment>,
        double_step_used: PlayerPair<bool>,
    ) -> Self {
        Self {
            size,
            swapped,
            paths,
            used: used.into_iter().collect(),
            segments,
            double_step_used,
        }
    }

    /// Side length of the grid.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Whether sides are swapped.
    pub fn swapped(&self) -> bool {
        self.swapped
    }

    pub(crate) fn set_swapped(&mut self, swapped: bool) {
        self.swapped = swapped;
    }

    /// Checks whether `p` is on the grid.
    pub fn contains(&self, p: Point) -> bool {
        p.is_on_board(self.size)
    }

    /// Returns the player's line, tail first.
    pub fn path(&self, player: Player) -> &[Point] {
        &self.paths[player]
    }

    /// Both lines.
    pub fn paths(&self) -> &PlayerPair<Vec<Point>> {
        &self.paths
    }

    /// First point of the player's line.
    pub fn tail(&self, player: Player) -> Option<Point> {
        self.paths[player].first().copied()
    }

    /// Last point of the player's line.
    pub fn head(&self, player: Player) -> Option<Point> {
        self.paths[player].last().copied()
    }

    /// Both ends of the player's line, or `None` before their first move.
    pub fn ends(&self, player: Player) -> Option<(Point, Point)> {
        self.tail(player).zip(self.head(player))
    }

    /// Checks whether the player has not moved yet.
    pub fn is_first_move(&self, player: Player) -> bool {
        self.paths[player].is_empty()
    }

    /// Checks whether `p` is an endpoint of any segment.
    pub fn is_used(&self, p: Point) -> bool {
        self.used.contains(&p)
    }

    /// The used-point set.
    pub fn used_points(&self) -> &HashSet<Point> {
        &self.used
    }

    /// Used points in row-major order.
    pub fn used_points_sorted(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.used.iter().copied().collect();
        points.sort_by_key(|p| (p.y, p.x));
        points
    }

    /// All segments in commit order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the player has consumed the double-step privilege.
    pub fn double_step_used(&self, player: Player) -> bool {
        self.double_step_used[player]
    }

    /// Double-step flags for both players.
    pub fn double_step_flags(&self) -> &PlayerPair<bool> {
        &self.double_step_used
    }

    /// Row the player's line may start from.
    pub fn start_row(&self, player: Player) -> i32 {
        let bottom = self.size - 1;
        match (player, self.swapped) {
            (Player::P1, false) | (Player::P2, true) => bottom,
            (Player::P2, false) | (Player::P1, true) => 0,
        }
    }

    /// Row the player must reach to win.
    pub fn goal_row(&self, player: Player) -> i32 {
        self.start_row(player.opponent())
    }

    /// Checks whether `p` is on the player's start edge.
    pub fn is_start_edge(&self, player: Player, p: Point) -> bool {
        self.contains(p) && p.y == self.start_row(player)
    }

    /// Checks whether `p` is on the player's goal edge.
    pub fn is_goal_edge(&self, player: Player, p: Point) -> bool {
        self.contains(p) && p.y == self.goal_row(player)
    }

    /// Row delta of one step forward for the player.
    pub fn forward_dir(&self, player: Player) -> i32 {
        if self.start_row(player) == 0 { 1 } else { -1 }
    }

    /// Points of the player's start edge, left to right.
    pub fn start_points(&self, player: Player) -> impl Iterator<Item = Point> + '_ {
        let row = self.start_row(player);
        (0..self.size).map(move |x| Point::new(x, row))
    }

    /// Which end of the player's line `from` is, if any.
    pub fn end_at(&self, player: Player, from: Point) -> Option<PathEnd> {
        if self.tail(player) == Some(from) {
            Some(PathEnd::Tail)
        } else if self.head(player) == Some(from) {
            Some(PathEnd::Head)
        } else {
            None
        }
    }

    /// Draws `from`–`to` for `player` without checking legality.
    ///
    /// Extends the line at the end `from` sits on (both points on a first
    /// move). Returns `false`, leaving the board untouched, when `from` is not
    /// an end of a non-empty line.
    #[instrument(skip(self))]
    pub(crate) fn draw(&mut self, player: Player, from: Point, to: Point) -> bool {
        let path = &mut self.paths[player];
        if path.is_empty() {
            path.push(from);
            path.push(to);
        } else if path.first() == Some(&from) {
            path.insert(0, to);
        } else if path.last() == Some(&from) {
            path.push(to);
        } else {
            return false;
        }

        self.used.insert(from);
        self.used.insert(to);
        self.segments.push(Segment::new(from, to, player));
        true
    }

    pub(crate) fn consume_double_step(&mut self, player: Player) {
        self.double_step_used[player] = true;
    }

    /// Clears lines, segments, used points and double-step rights.
    pub(crate) fn clear(&mut self) {
        self.paths = PlayerPair::default();
        self.used.clear();
        self.segments.clear();
        self.double_step_used = PlayerPair::default();
    }

    fn symbol_at(&self, p: Point) -> char {
        let in_first = self.paths.first.contains(&p);
        let in_second = self.paths.second.contains(&p);
        match (in_first, in_second) {
            (true, true) => '*',
            (true, false) => '1',
            (false, true) => '2',
            (false, false) if self.used.contains(&p) => '+',
            (false, false) => '.',
        }
    }
}

impl std::fmt::Display for Board {
    /// Renders the grid with row numbers, one character per point.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  ")?;
        for x in 0..self.size {
            write!(f, " {}", x)?;
        }
        writeln!(f)?;
        for y in 0..self.size {
            write!(f, "{:>2}", y)?;
            for x in 0..self.size {
                write!(f, " {}", self.symbol_at(Point::new(x, y)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_follow_swap() {
        let mut board = Board::new(5);
        assert_eq!(board.start_row(Player::P1), 4);
        assert_eq!(board.goal_row(Player::P1), 0);
        assert_eq!(board.forward_dir(Player::P1), -1);
        assert_eq!(board.forward_dir(Player::P2), 1);

        board.set_swapped(true);
        assert_eq!(board.start_row(Player::P1), 0);
        assert_eq!(board.goal_row(Player::P2), 0);
        assert_eq!(board.forward_dir(Player::P1), 1);
    }

    #[test]
    fn test_draw_extends_either_end() {
        let mut board = Board::new(5);
        assert!(board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3)));
        assert_eq!(board.path(Player::P1), &[Point::new(2, 4), Point::new(2, 3)]);

        // Tail extension prepends.
        assert!(board.draw(Player::P1, Point::new(2, 4), Point::new(1, 4)));
        // Head extension appends.
        assert!(board.draw(Player::P1, Point::new(2, 3), Point::new(2, 2)));
        assert_eq!(
            board.path(Player::P1),
            &[
                Point::new(1, 4),
                Point::new(2, 4),
                Point::new(2, 3),
                Point::new(2, 2)
            ]
        );
        assert_eq!(board.segments().len(), 3);
        assert_eq!(board.used_points().len(), 4);
    }

    #[test]
    fn test_draw_rejects_interior_origin() {
        let mut board = Board::new(5);
        board.draw(Player::P1, Point::new(2, 4), Point::new(2, 3));
        board.draw(Player::P1, Point::new(2, 3), Point::new(2, 2));
        let before = board.clone();
        assert!(!board.draw(Player::P1, Point::new(2, 3), Point::new(3, 3)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_display_marks_lines() {
        let mut board = Board::new(3);
        board.draw(Player::P2, Point::new(0, 0), Point::new(0, 1));
        let text = board.to_string();
        assert_eq!(text, "   0 1 2\n 0 2 . .\n 1 2 . .\n 2 . . .\n");
    }
}
