//! Board invariants.
//!
//! Each one is a named predicate over a [`Board`](crate::Board); sets of them
//! are checked after every commit and on snapshot import.

/// A named predicate that every reachable `S` satisfies.
pub trait Invariant<S> {
    /// Evaluates the predicate.
    fn holds(state: &S) -> bool;

    /// Text used in violation reports.
    fn description() -> &'static str;
}

/// A predicate that failed, by description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// What should have held.
    pub description: String,
}

impl InvariantViolation {
    /// Wraps a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Joins violation descriptions for error messages.
pub fn describe(violations: &[InvariantViolation]) -> String {
    violations
        .iter()
        .map(|v| v.description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Invariants checked as a group; implemented for tuples of two and three.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(checks: &[(bool, &'static str)]) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<InvariantViolation> = checks
        .iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(*description))
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect(&[
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ])
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect(&[
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ])
    }
}

pub mod path_ends;
pub mod segment_count;
pub mod used_points;

pub use path_ends::PathEndsUsedInvariant;
pub use segment_count::SegmentCountInvariant;
pub use used_points::UsedPointsInvariant;

/// All board invariants as a composable set.
pub type BoardInvariants = (
    UsedPointsInvariant,
    PathEndsUsedInvariant,
    SegmentCountInvariant,
);
