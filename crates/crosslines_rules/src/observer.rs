//! Observer seams the session calls out through.
//!
//! Observers run while the session is mutably borrowed, so they cannot call
//! back into it; they should only record or hand data off.

use super::action::MoveCommitted;

/// Receives every locally committed move.
pub trait MoveObserver: Send {
    /// Called once per local commit, after the board is updated.
    fn on_move_committed(&mut self, event: &MoveCommitted);
}

impl<F> MoveObserver for F
where
    F: FnMut(&MoveCommitted) + Send,
{
    fn on_move_committed(&mut self, event: &MoveCommitted) {
        self(event)
    }
}

/// Receives human-readable status text for display.
pub trait StatusObserver: Send {
    /// Called after commits, turn switches, terminal states and other
    /// user-visible changes.
    fn on_status(&mut self, status: &str);
}

impl<F> StatusObserver for F
where
    F: FnMut(&str) + Send,
{
    fn on_status(&mut self, status: &str) {
        self(status)
    }
}
