//! A [`TerminationCondition`] is polled by the engine before it pops the next propagator. When it
//! triggers, [`crate::engine::PropagationEngine::propagate`] returns early with
//! [`crate::engine::PropagationOutcome::Interrupted`]; the domains are then only partially
//! propagated.

mod indefinite;
mod time_budget;

pub use indefinite::Indefinite;
pub use time_budget::TimeBudget;

/// The central trait that defines a termination condition.
pub trait TerminationCondition {
    /// Returns `true` when propagation should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for Box<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().should_stop()
    }
}
