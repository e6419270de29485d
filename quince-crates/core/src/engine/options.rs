#[cfg(doc)]
use crate::engine::PropagationEngine;

/// When pending variable events are turned into scheduled propagators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PropagationMode {
    /// Every pending variable is dispatched after every propagator execution.
    #[default]
    ConstraintOriented,
    /// Every pending variable is dispatched after every propagator execution, as in
    /// [`PropagationMode::ConstraintOriented`].
    Hybrid,
    /// Pending variables are dispatched one per round, never in between propagator executions.
    VariableOriented,
}

/// Configuration of a [`PropagationEngine`].
#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    /// The number of priority queues. Every propagator priority must be below this value.
    pub num_priorities: u8,
    pub mode: PropagationMode,
    /// Verify that propagators only report changes to variables in their own scope.
    pub check_scope: bool,
    /// Initially activate propagators by increasing priority, then by increasing arity, rather
    /// than in the order they were added.
    pub sort_by_priority: bool,
    /// Attach an empty Boolean core when the engine is created.
    pub boolean_core: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            num_priorities: 7,
            mode: PropagationMode::default(),
            check_scope: false,
            sort_by_priority: true,
            boolean_core: false,
        }
    }
}
