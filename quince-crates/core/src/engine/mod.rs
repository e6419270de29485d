//! The propagation engine and the state it drives.
//!
//! The [`PropagationEngine`] decides which propagator runs next. Propagators are woken by
//! domain events reported through [`PropagationEngine::on_variable_update`], wait in one of
//! several priority queues and are run until nothing changes anymore. Reversible state lives in
//! an [`Environment`] that the caller pushes and pops alongside its own search.
mod dyn_propagators;
mod environment;
mod options;
mod propagation_engine;
mod propagator_queue;
pub mod termination;
mod variable_event_queue;

pub(crate) use dyn_propagators::DynPropagators;
pub use environment::Environment;
pub use environment::TrailedInteger;
pub use options::EngineOptions;
pub use options::PropagationMode;
pub use propagation_engine::EngineStatistics;
pub use propagation_engine::PropagationEngine;
pub use propagation_engine::PropagationOutcome;
pub(crate) use propagator_queue::PriorityQueueBank;
pub(crate) use propagator_queue::MAX_PRIORITIES;
pub(crate) use variable_event_queue::VariableEventQueue;
