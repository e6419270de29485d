use thiserror::Error;

use crate::propagation::PropagatorId;
use crate::variables::VariableId;

/// The result of running a propagator, or of any step of the fixpoint loop.
pub type PropagationStatus = Result<(), Contradiction>;

/// A failure of the current search node.
///
/// A contradiction is never repaired in place: the caller backtracks (restoring domains through
/// its own backtrackable memory) and flushes the engine before propagating again.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contradiction {
    /// A domain operation removed the last value of a variable.
    #[error("the domain of {variable} became empty")]
    EmptyDomain { variable: VariableId },
    /// A propagator found the current domains to be inconsistent with its constraint.
    #[error("{propagator} failed: {reason}")]
    Propagator {
        propagator: PropagatorId,
        reason: &'static str,
    },
    /// The attached Boolean core found a clause with every literal false.
    #[error("a clause of the Boolean core is violated")]
    Clause,
}

impl Contradiction {
    pub fn is_clausal(&self) -> bool {
        matches!(self, Contradiction::Clause)
    }
}
