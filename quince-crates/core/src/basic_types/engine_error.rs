use thiserror::Error;

use crate::propagation::Priority;
use crate::propagation::PropagatorId;

/// Misuse of the engine lifecycle or configuration.
///
/// These are programming errors in the layer that builds the model; they are reported when the
/// offending call is made and are not meant to be recovered from during search.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("{propagator} has priority {priority} but the engine only has {num_priorities} queues")]
    PriorityOutOfRange {
        propagator: PropagatorId,
        priority: Priority,
        num_priorities: u8,
    },
    #[error("the engine must be initialised before propagators can be added dynamically")]
    NotInitialized,
    #[error("the engine has already been initialised")]
    AlreadyInitialized,
    #[error("{0} is not present in the propagator store")]
    UnknownPropagator(PropagatorId),
    #[error("{0} is already attached to the engine")]
    AlreadyAttached(PropagatorId),
    #[error("{0} is not attached to the engine")]
    Detached(PropagatorId),
}
