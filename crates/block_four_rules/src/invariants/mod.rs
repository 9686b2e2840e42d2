//! Properties every reachable Block Four position satisfies.
//!
//! Each invariant is a zero-sized type checked independently; the contracts
//! run the whole [`BlockFourInvariants`] set after every accepted transition
//! in debug builds.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks every member; collects all that fail.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>),+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

pub mod alternating_turn;
pub mod center_first;
pub mod history_consistent;
pub mod supply_consistent;

pub use alternating_turn::AlternatingTurnInvariant;
pub use center_first::CenterFirstInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use supply_consistent::SupplyConsistentInvariant;

/// All Block Four invariants as a composable set.
pub type BlockFourInvariants = (
    CenterFirstInvariant,
    AlternatingTurnInvariant,
    HistoryConsistentInvariant,
    SupplyConsistentInvariant,
);
