//! Peer synchronisation: move envelopes, remote replay, roles, snapshots.

pub mod message;
pub mod remote;
pub mod role;
pub mod snapshot;
pub mod transport;

pub use message::{DecodeError, MOVE_TAG, MoveMessage, PROTOCOL_VERSION};
pub use remote::{RemoteApplied, RemoteError, RemoteReport, apply_remote_move};
pub use role::{Role, RoleError, apply_role, begin_role_handshake, decide_random_role};
pub use snapshot::{Snapshot, SnapshotError, export_snapshot, import_snapshot};
pub use transport::{SyncPublisher, Transport, TransportError};
