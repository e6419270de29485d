//! The narrow contract between the engine and variables.
//!
//! Domains themselves (integer intervals, sets, reals, graphs) live outside this crate. The
//! engine only needs three things from a variable: an identifier, a [`VariableNotifier`] holding
//! its pending events and subscriptions, and a way to find the variable again through a
//! [`VariableStore`]. Every domain mutation must be reported through
//! [`crate::engine::PropagationEngine::on_variable_update`] (or
//! [`crate::propagation::PropagationContext::notify`] from inside a propagator).
mod domain_event;
mod notifier;
mod variable_id;

pub use domain_event::DomainEvent;
pub use domain_event::EventMask;
pub use notifier::Cause;
pub use notifier::Subscription;
pub use notifier::VariableNotifier;
pub use variable_id::VariableId;
pub use variable_id::VariableKind;

/// A decision variable as seen by the engine.
pub trait Variable {
    fn id(&self) -> VariableId;

    fn kind(&self) -> VariableKind;

    fn notifier(&self) -> &VariableNotifier;

    fn notifier_mut(&mut self) -> &mut VariableNotifier;
}

/// Owner of the variables of a model.
pub trait VariableStore {
    fn num_variables(&self) -> usize;

    fn variable(&self, id: VariableId) -> &dyn Variable;

    fn variable_mut(&mut self, id: VariableId) -> &mut dyn Variable;

    fn notifier(&self, id: VariableId) -> &VariableNotifier {
        self.variable(id).notifier()
    }

    fn notifier_mut(&mut self, id: VariableId) -> &mut VariableNotifier {
        self.variable_mut(id).notifier_mut()
    }
}
