//! Versioned move envelope exchanged between peers.
//!
//! Wire form: `{"v":1,"t":"m","p":1,"f":[x,y],"to":[x,y],"ds":false}`.

use super::super::action::MoveCommitted;
use super::super::types::{Player, Point};
use derive_more::Display;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// Protocol version carried in every envelope.
pub const PROTOCOL_VERSION: u64 = 1;

/// Message type tag of a move envelope.
pub const MOVE_TAG: &str = "m";

/// A decoded move envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct MoveMessage {
    /// Declared mover.
    pub player: Player,
    /// Origin.
    pub from: Point,
    /// Destination.
    pub to: Point,
    /// Sender's double-step flag. Informational; receivers recompute it.
    pub is_double_step: bool,
}

impl From<&MoveCommitted> for MoveMessage {
    fn from(event: &MoveCommitted) -> Self {
        Self::new(event.player, event.from, event.to, event.is_double_step)
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    v: u64,
    t: &'a str,
    p: Player,
    f: [i32; 2],
    to: [i32; 2],
    ds: bool,
}

/// Why an envelope could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DecodeError {
    /// Not valid JSON.
    #[display("Payload is not valid JSON")]
    Parse,
    /// Not an object, or wrong version, type or player tag.
    #[display("Payload is not a version {} move envelope", PROTOCOL_VERSION)]
    Shape,
    /// Coordinate arrays missing or not two integers each.
    #[display("Payload coordinates are malformed")]
    Coords,
}

impl std::error::Error for DecodeError {}

impl MoveMessage {
    /// Serializes the envelope.
    pub fn encode(&self) -> String {
        let envelope = Envelope {
            v: PROTOCOL_VERSION,
            t: MOVE_TAG,
            p: self.player,
            f: [self.from.x, self.from.y],
            to: [self.to.x, self.to.y],
            ds: self.is_double_step,
        };
        // A struct of integers, strings and bools always serializes.
        serde_json::to_string(&envelope).unwrap_or_default()
    }

    /// Parses and validates an envelope before any game logic sees it.
    #[instrument(level = "debug")]
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(payload).map_err(|_| DecodeError::Parse)?;
        let fields = value.as_object().ok_or(DecodeError::Shape)?;

        if fields.get("v").and_then(Value::as_u64) != Some(PROTOCOL_VERSION)
            || fields.get("t").and_then(Value::as_str) != Some(MOVE_TAG)
        {
            return Err(DecodeError::Shape);
        }

        let player = fields
            .get("p")
            .and_then(Value::as_u64)
            .and_then(|tag| u8::try_from(tag).ok())
            .and_then(Player::from_tag)
            .ok_or(DecodeError::Shape)?;
        let from = coords(fields.get("f"))?;
        let to = coords(fields.get("to"))?;
        let is_double_step = match fields.get("ds") {
            None => false,
            Some(flag) => flag.as_bool().ok_or(DecodeError::Shape)?,
        };

        Ok(Self::new(player, from, to, is_double_step))
    }
}

fn coords(value: Option<&Value>) -> Result<Point, DecodeError> {
    let component = |v: &Value| v.as_i64().and_then(|n| i32::try_from(n).ok());
    match value.and_then(Value::as_array).map(Vec::as_slice) {
        Some([x, y]) => match (component(x), component(y)) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => Err(DecodeError::Coords),
        },
        _ => Err(DecodeError::Coords),
    }
}
