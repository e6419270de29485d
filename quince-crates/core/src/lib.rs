//! # quince
//! A propagation core for constraint solvers: a priority-driven scheduler that runs propagators
//! until a fixpoint, and an embedded Boolean satisfiability core with two-watched-literal unit
//! propagation that can be used standalone or as the clausal backend of the engine.
//!
//! The crate does not own variables or constraints. Variables are reached through the
//! [`variables::VariableStore`] contract, propagators implement [`propagation::Propagator`] and
//! are kept in a [`propagation::PropagatorStore`]. The [`engine::PropagationEngine`] borrows both
//! for the duration of a call.
//!
//! ```
//! use quince_core::sat::SatSolver;
//!
//! let mut sat = SatSolver::default();
//! let a = sat.new_variable();
//! let b = sat.new_variable();
//!
//! // a \/ b
//! sat.add_binary(a.positive(), b.positive()).expect("root level clause");
//!
//! sat.push_trail_marker();
//! assert!(sat.enqueue(a.negative()));
//! assert!(sat.propagate());
//! assert_eq!(Some(true), sat.value_literal(b.positive()));
//! ```
#[doc(hidden)]
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub mod engine;
pub mod propagation;
pub mod sat;
pub mod variables;

#[cfg(test)]
pub(crate) mod test_helper;

pub use crate::basic_types::ClauseOperationError;
pub use crate::basic_types::Contradiction;
pub use crate::basic_types::EngineError;
pub use crate::basic_types::PropagationStatus;
pub use crate::engine::termination;
