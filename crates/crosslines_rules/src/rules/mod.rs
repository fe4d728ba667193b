//! Game rules for crosslines.
//!
//! Pure functions over a [`Board`](crate::Board) and a
//! [`RulesConfig`](crate::RulesConfig). Nothing here mutates state, so the
//! same checks serve local input, remote replay and hint generation.

pub mod double_step;
pub mod mobility;
pub mod step;
pub mod win;

pub use double_step::{double_step_eligible, double_step_target, is_double_step_move};
pub use mobility::{
    StepKind, check_destination, has_any_move, legal_destinations, legal_moves, valid_origins,
};
pub use step::{IllegalReason, check_step, neighbors_of};
pub use win::winner_after;
