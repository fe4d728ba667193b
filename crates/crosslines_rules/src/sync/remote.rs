//! Applying moves received from the peer.

use super::super::action::{Move, MoveError, MoveOrigin, Transition};
use super::super::contracts::{PlayersTurn, ValidOrigin};
use super::super::game::GameSession;
use super::super::types::Player;
use super::message::{DecodeError, MoveMessage};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Why a remote move was refused. `Display` yields the wire error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RemoteError {
    /// Payload is not JSON.
    #[display("parse_error")]
    ParseError,
    /// Wrong shape, version, type or player tag.
    #[display("bad_message")]
    BadMessage,
    /// Coordinates missing or malformed.
    #[display("bad_coords")]
    BadCoords,
    /// The declared mover is not the player to move here.
    #[display("out_of_turn_expected_{}_got_{}", expected.tag(), got.tag())]
    OutOfTurn {
        /// Player to move locally.
        expected: Player,
        /// Player named in the message.
        got: Player,
    },
    /// First-move origin off the start edge.
    #[display("invalid_start_point")]
    InvalidStartPoint,
    /// Later-move origin that is not an end of the line.
    #[display("from_not_endpoint")]
    FromNotEndpoint,
    /// Full re-validation failed.
    #[display("illegal_move")]
    IllegalMove,
}

impl std::error::Error for RemoteError {}

impl From<DecodeError> for RemoteError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Parse => RemoteError::ParseError,
            DecodeError::Shape => RemoteError::BadMessage,
            DecodeError::Coords => RemoteError::BadCoords,
        }
    }
}

impl From<MoveError> for RemoteError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::WrongPlayer { expected, got } => RemoteError::OutOfTurn { expected, got },
            MoveError::InvalidStartPoint(_) => RemoteError::InvalidStartPoint,
            MoveError::NotEndpoint(_) => RemoteError::FromNotEndpoint,
            MoveError::GameOver | MoveError::Illegal(_) | MoveError::InvariantViolation(_) => {
                RemoteError::IllegalMove
            }
        }
    }
}

/// A remote move that was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteApplied {
    /// Set when the move ended the game.
    pub winner: Option<Player>,
}

/// Serializable reply: `{"ok":true}`, `{"ok":true,"winner":1}` or
/// `{"ok":false,"error":"bad_coords"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteReport {
    /// Whether the move was applied.
    pub ok: bool,
    /// Wire error code on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Winner when the move ended the game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
}

impl From<&Result<RemoteApplied, RemoteError>> for RemoteReport {
    fn from(result: &Result<RemoteApplied, RemoteError>) -> Self {
        match result {
            Ok(applied) => Self {
                ok: true,
                error: None,
                winner: applied.winner,
            },
            Err(err) => Self {
                ok: false,
                error: Some(err.to_string()),
                winner: None,
            },
        }
    }
}

/// Decodes, re-validates and commits a move from the peer.
///
/// Uses the same commit path as local moves; the move observer is not
/// notified. Any error leaves the session untouched.
#[instrument(skip(session))]
pub fn apply_remote_move(
    session: &mut GameSession,
    payload: &str,
) -> Result<RemoteApplied, RemoteError> {
    let result = MoveMessage::decode(payload)
        .map_err(RemoteError::from)
        .and_then(|msg| replay(session, &msg).map_err(RemoteError::from));

    match result {
        Ok(transition) => {
            debug!(?transition, "Remote move applied");
            Ok(RemoteApplied {
                winner: match transition {
                    Transition::Continue(_) => None,
                    Transition::Finished(outcome) => Some(outcome.winner()),
                },
            })
        }
        Err(err) => {
            warn!(code = %err, "Rejected remote move");
            Err(err)
        }
    }
}

/// Turn and origin are checked before anything else, so a message from the
/// wrong peer reads as out of turn even once the game is over.
fn replay(session: &mut GameSession, msg: &MoveMessage) -> Result<Transition, MoveError> {
    let mov = Move::new(msg.player, msg.from, msg.to);
    PlayersTurn::check(&mov, session.state())?;
    ValidOrigin::check(&mov, session.state(), session.config())?;
    session.commit(mov, MoveOrigin::Remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RemoteError::OutOfTurn {
                expected: Player::P1,
                got: Player::P2
            }
            .to_string(),
            "out_of_turn_expected_1_got_2"
        );
        assert_eq!(RemoteError::BadCoords.to_string(), "bad_coords");
    }

    #[test]
    fn test_apply_valid_remote_move() {
        let mut session = GameSession::default();
        let payload = r#"{"v":1,"t":"m","p":1,"f":[2,4],"to":[2,3],"ds":false}"#;
        let applied = apply_remote_move(&mut session, payload);
        assert_eq!(applied, Ok(RemoteApplied { winner: None }));
        assert_eq!(session.current_player(), Player::P2);
        assert!(session.board().is_used(Point::new(2, 3)));
    }

    #[test]
    fn test_origin_errors() {
        let mut session = GameSession::default();
        assert_eq!(
            apply_remote_move(&mut session, r#"{"v":1,"t":"m","p":1,"f":[2,3],"to":[2,2]}"#),
            Err(RemoteError::InvalidStartPoint)
        );
        session
            .propose_move(Point::new(2, 4), Point::new(2, 3), Player::P1)
            .unwrap();
        session
            .propose_move(Point::new(0, 0), Point::new(0, 1), Player::P2)
            .unwrap();
        assert_eq!(
            apply_remote_move(&mut session, r#"{"v":1,"t":"m","p":1,"f":[1,3],"to":[1,2]}"#),
            Err(RemoteError::FromNotEndpoint)
        );
        assert_eq!(
            apply_remote_move(&mut session, r#"{"v":1,"t":"m","p":1,"f":[2,3],"to":[2,4]}"#),
            Err(RemoteError::IllegalMove)
        );
    }

    #[test]
    fn test_report_serialization() {
        let ok: Result<RemoteApplied, RemoteError> = Ok(RemoteApplied {
            winner: Some(Player::P2),
        });
        assert_eq!(
            serde_json::to_string(&RemoteReport::from(&ok)).unwrap(),
            r#"{"ok":true,"winner":2}"#
        );
        let err: Result<RemoteApplied, RemoteError> = Err(RemoteError::ParseError);
        assert_eq!(
            serde_json::to_string(&RemoteReport::from(&err)).unwrap(),
            r#"{"ok":false,"error":"parse_error"}"#
        );
    }
}
