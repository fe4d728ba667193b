//! Core domain types for crosslines.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A point on the grid, addressed by column `x` and row `y`.
///
/// Row 0 is the top edge of the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_new::new,
)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Returns this point shifted by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Checks whether the point lies on a `size`×`size` board.
    pub fn is_on_board(self, size: i32) -> bool {
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Error returned when text cannot be read as a point.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Cannot read {:?} as a point, expected \"x,y\"", input)]
pub struct PointParseError {
    /// The rejected text.
    #[error(not(source))]
    pub input: String,
}

impl FromStr for Point {
    type Err = PointParseError;

    /// Parses `"x,y"`, tolerating surrounding parentheses and whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PointParseError {
            input: s.to_string(),
        };
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (x, y) = trimmed.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Self::new(x, y))
    }
}

/// Player in the game.
///
/// On the wire a player is the integer tag `1` or `2`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    /// First player. Starts on the bottom edge unless sides are swapped.
    P1,
    /// Second player. Starts on the top edge unless sides are swapped.
    P2,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Wire tag of this player.
    pub fn tag(self) -> u8 {
        match self {
            Player::P1 => 1,
            Player::P2 => 2,
        }
    }

    /// Reads a wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Player::P1),
            2 => Some(Player::P2),
            _ => None,
        }
    }

    /// Human-readable seat name.
    pub fn label(self) -> &'static str {
        match self {
            Player::P1 => "first",
            Player::P2 => "second",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{} ({})", self.tag(), self.label())
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.tag()
    }
}

/// Error returned for a player tag other than 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Unknown player tag {}", tag)]
pub struct PlayerTagError {
    /// The rejected tag.
    #[error(not(source))]
    pub tag: u8,
}

impl TryFrom<u8> for Player {
    type Error = PlayerTagError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Player::from_tag(tag).ok_or(PlayerTagError { tag })
    }
}

/// One value per player, indexable by [`Player`].
///
/// Serializes as an object keyed by wire tag: `{"1": .., "2": ..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    /// Value for [`Player::P1`].
    #[serde(rename = "1", default)]
    pub first: T,
    /// Value for [`Player::P2`].
    #[serde(rename = "2", default)]
    pub second: T,
}

impl<T> PlayerPair<T> {
    /// Builds a pair from both values.
    pub fn new(first: T, second: T) -> Self {
        Self { first, second }
    }
}

impl<T> Index<Player> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        match player {
            Player::P1 => &self.first,
            Player::P2 => &self.second,
        }
    }
}

impl<T> IndexMut<Player> for PlayerPair<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::P1 => &mut self.first,
            Player::P2 => &mut self.second,
        }
    }
}

/// A committed line between two adjacent (or double-step) points.
///
/// Endpoints are unordered for every rule; `a` is the origin of the move that
/// drew it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Segment {
    /// Origin endpoint.
    pub a: Point,
    /// Destination endpoint.
    pub b: Point,
    /// Owner of the line.
    pub player: Player,
}

impl Segment {
    /// Checks whether `p` is one of the two endpoints.
    pub fn has_endpoint(&self, p: Point) -> bool {
        self.a == p || self.b == p
    }
}

/// How a finished game was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The winner's line reached their goal edge.
    ReachedGoal(Player),
    /// The loser had no legal move on their turn.
    Stalemate {
        /// Player who made the last move.
        winner: Player,
        /// Player left without a move.
        stuck: Player,
    },
}

impl Outcome {
    /// Returns the winner.
    pub fn winner(&self) -> Player {
        match self {
            Outcome::ReachedGoal(player) => *player,
            Outcome::Stalemate { winner, .. } => *winner,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::ReachedGoal(player) => write!(f, "{} wins!", player),
            Outcome::Stalemate { winner, stuck } => {
                write!(f, "{} has no legal move. {} wins!", stuck, winner)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_parse() {
        assert_eq!("2,4".parse::<Point>(), Ok(Point::new(2, 4)));
        assert_eq!(" (0, 3) ".parse::<Point>(), Ok(Point::new(0, 3)));
        assert!("2;4".parse::<Point>().is_err());
        assert!("a,b".parse::<Point>().is_err());
    }

    #[test]
    fn test_player_tag_serde() {
        assert_eq!(serde_json::to_string(&Player::P2).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Player>("1").unwrap(), Player::P1);
        assert!(serde_json::from_str::<Player>("3").is_err());
    }

    #[test]
    fn test_player_pair_keys() {
        let pair = PlayerPair::new(true, false);
        assert_eq!(
            serde_json::to_string(&pair).unwrap(),
            r#"{"1":true,"2":false}"#
        );
        assert!(pair[Player::P1]);
        assert!(!pair[Player::P2]);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = Outcome::Stalemate {
            winner: Player::P1,
            stuck: Player::P2,
        };
        assert_eq!(outcome.winner(), Player::P1);
        assert_eq!(
            outcome.to_string(),
            "P2 (second) has no legal move. P1 (first) wins!"
        );
    }
}
