//! Transport capability and the publisher that feeds it.

use super::super::action::MoveCommitted;
use super::super::observer::MoveObserver;
use super::message::MoveMessage;
use derive_more::{Display, Error};
use tracing::{debug, warn};

/// Failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Transport error: {}", message)]
pub struct TransportError {
    /// What went wrong.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outgoing half of a peer connection.
///
/// Adapters for a concrete networking service live outside this crate.
pub trait Transport: Send {
    /// Hands a payload to the peer.
    fn send(&mut self, payload: &str) -> Result<(), TransportError>;
}

impl<F> Transport for F
where
    F: FnMut(&str) -> Result<(), TransportError> + Send,
{
    fn send(&mut self, payload: &str) -> Result<(), TransportError> {
        self(payload)
    }
}

/// Move observer that encodes local commits and sends them to the peer.
///
/// Send failures are logged and dropped; the local commit stands.
#[derive(Debug)]
pub struct SyncPublisher<T> {
    transport: T,
}

impl<T: Transport> SyncPublisher<T> {
    /// Wraps a transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> MoveObserver for SyncPublisher<T> {
    fn on_move_committed(&mut self, event: &MoveCommitted) {
        let payload = MoveMessage::from(event).encode();
        match self.transport.send(&payload) {
            Ok(()) => debug!(%payload, "Move sent"),
            Err(e) => warn!(error = %e, %payload, "Failed to send move"),
        }
    }
}
