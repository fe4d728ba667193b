//! Crosslines rules engine and peer synchronisation.
//!
//! Two players draw lines across a point grid, one segment per turn, each
//! trying to reach the opposite edge without crossing or touching the other
//! line.
//!
//! # Architecture
//!
//! - **Geometry**: orientation and proper-intersection predicates
//! - **Board**: per-player lines, used points, segments
//! - **Rules**: step legality, double-step privilege, mobility, win detection
//! - **Session**: turn/win/stalemate state machine with undo history
//! - **Sync**: versioned move envelopes, remote replay, roles, snapshots
//!
//! # Example
//!
//! ```
//! use crosslines_rules::{GameSession, Player, Point, RulesConfig, Transition};
//!
//! let mut session = GameSession::new(RulesConfig::default());
//! let transition = session.propose_move(Point::new(2, 4), Point::new(2, 3), Player::P1);
//! assert_eq!(transition, Ok(Transition::Continue(Player::P2)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod board;
mod config;
mod contracts;
mod game;
mod geometry;
mod invariants;
mod observer;
mod rules;
mod state;
mod sync;
mod types;

// Crate-level exports - Domain types
pub use types::{Outcome, Player, PlayerPair, PlayerTagError, Point, PointParseError, Segment};

// Crate-level exports - Board model
pub use board::{Board, PathEnd};

// Crate-level exports - Configuration
pub use config::{BOARD_SIZES, ConfigError, DoubleStepGrant, RulesConfig};

// Crate-level exports - Geometry and rules
pub use geometry::{orientation, proper_intersect};
pub use rules::{
    IllegalReason, StepKind, check_destination, check_step, double_step_eligible,
    double_step_target, has_any_move, is_double_step_move, legal_destinations, legal_moves,
    neighbors_of, valid_origins, winner_after,
};

// Crate-level exports - Actions, contracts, invariants
pub use action::{Move, MoveCommitted, MoveError, MoveOrigin, Transition};
pub use contracts::{
    Contract, GameInProgress, LegalMove, LegalStep, MoveContract, PlayersTurn, ValidOrigin,
};
pub use invariants::{
    BoardInvariants, Invariant, InvariantSet, InvariantViolation, PathEndsUsedInvariant,
    SegmentCountInvariant, UsedPointsInvariant,
};

// Crate-level exports - Session
pub use game::{ClickError, ClickOutcome, GameSession};
pub use observer::{MoveObserver, StatusObserver};
pub use state::{GameState, Phase};

// Crate-level exports - Sync
pub use sync::{
    DecodeError, MOVE_TAG, MoveMessage, PROTOCOL_VERSION, RemoteApplied, RemoteError,
    RemoteReport, Role, RoleError, Snapshot, SnapshotError, SyncPublisher, Transport,
    TransportError, apply_remote_move, apply_role, begin_role_handshake, decide_random_role,
    export_snapshot, import_snapshot,
};
