//! Whole-board snapshots for resynchronising peers.

use super::super::board::Board;
use super::super::game::GameSession;
use super::super::invariants::{BoardInvariants, InvariantSet, describe};
use super::super::types::{PlayerPair, Point, Segment};
use super::message::PROTOCOL_VERSION;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Serialized board: lines, used points, segments and double-step rights.
///
/// The player to move and the selection are not included; importing always
/// hands the turn to P1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Protocol version.
    pub v: u64,
    /// Whether sides are swapped.
    #[serde(default)]
    pub swapped: bool,
    /// Each player's line.
    #[serde(default)]
    pub paths: PlayerPair<Vec<Point>>,
    /// Used points in row-major order.
    #[serde(default)]
    pub used_points: Vec<Point>,
    /// Segments in commit order.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Consumed double-step rights.
    #[serde(default)]
    pub double_step_used: PlayerPair<bool>,
}

impl Snapshot {
    /// Captures the board.
    pub fn capture(board: &Board) -> Self {
        Self {
            v: PROTOCOL_VERSION,
            swapped: board.swapped(),
            paths: board.paths().clone(),
            used_points: board.used_points_sorted(),
            segments: board.segments().to_vec(),
            double_step_used: *board.double_step_flags(),
        }
    }

    /// Rebuilds a board of `size`, checking bounds and board invariants.
    pub fn into_board(self, size: i32) -> Result<Board, SnapshotError> {
        if self.v != PROTOCOL_VERSION {
            return Err(SnapshotError::Version(self.v));
        }
        let off_board = self
            .paths
            .first
            .iter()
            .chain(&self.paths.second)
            .chain(&self.used_points)
            .chain(self.segments.iter().flat_map(|s| [&s.a, &s.b]))
            .find(|p| !p.is_on_board(size));
        if let Some(point) = off_board {
            return Err(SnapshotError::OffBoard(*point));
        }

        let board = Board::from_parts(
            size,
            self.swapped,
            self.paths,
            self.used_points,
            self.segments,
            self.double_step_used,
        );
        BoardInvariants::check_all(&board)
            .map_err(|violations| SnapshotError::Inconsistent(describe(&violations)))?;
        Ok(board)
    }
}

/// Why a snapshot was refused.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SnapshotError {
    /// Not valid snapshot JSON.
    #[display("Snapshot parse error: {}", _0)]
    Parse(#[error(not(source))] String),
    /// Unsupported version.
    #[display("Snapshot version {} is not {}", _0, PROTOCOL_VERSION)]
    Version(#[error(not(source))] u64),
    /// A point lies outside the board.
    #[display("Snapshot point {} is off the board", _0)]
    OffBoard(#[error(not(source))] Point),
    /// The board breaks an invariant.
    #[display("Snapshot is inconsistent: {}", _0)]
    Inconsistent(#[error(not(source))] String),
}

/// Serializes the session's board.
pub fn export_snapshot(session: &GameSession) -> String {
    // Points, bools and integers always serialize.
    serde_json::to_string(&Snapshot::capture(session.board())).unwrap_or_default()
}

/// Replaces the session's board with a snapshot; the import is undoable.
///
/// On success P1 is to move, nothing is selected and any outcome is cleared.
/// On failure the session is untouched.
#[instrument(skip_all)]
pub fn import_snapshot(session: &mut GameSession, payload: &str) -> Result<(), SnapshotError> {
    let snapshot: Snapshot = serde_json::from_str(payload).map_err(|e| {
        warn!(error = %e, "Rejected snapshot");
        SnapshotError::Parse(e.to_string())
    })?;
    let board = snapshot
        .into_board(session.board().size())
        .inspect_err(|e| warn!(error = %e, "Rejected snapshot"))?;
    info!(segments = board.segments().len(), "Snapshot imported");
    session.restore_board(board);
    Ok(())
}
