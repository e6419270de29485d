//! Propagators and the means through which they interact with the engine.
//!
//! A [`Propagator`] narrows the domains of the variables in its scope. The engine calls it
//! either coarsely ([`Propagator::propagate`], a full re-evaluation) or, for propagators that
//! react to fine events, once per variable that changed ([`Propagator::propagate_event`]).
//! Every domain change a propagator makes must be reported with
//! [`PropagationContext::notify`], which is how the engine learns which other propagators to
//! schedule.
mod context;
mod local_id;
mod priority;
mod propagator;
mod propagator_id;
mod store;

pub use context::PropagationContext;
pub(crate) use context::ContextRequests;
pub use local_id::LocalId;
pub use priority::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub use store::PropagatorHandle;
pub use store::PropagatorStore;
