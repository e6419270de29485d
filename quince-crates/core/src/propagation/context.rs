use super::PropagatorId;
use crate::basic_types::Contradiction;
use crate::engine::Environment;
use crate::engine::VariableEventQueue;
use crate::quince_assert_simple;
use crate::sat::SatSolver;
use crate::variables::Cause;
use crate::variables::DomainEvent;
use crate::variables::VariableId;
use crate::variables::VariableStore;

/// Requests a propagator makes to the engine while it runs; applied once it returns.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ContextRequests {
    pub(crate) passive: bool,
    pub(crate) delayed_full_propagation: bool,
}

/// The view of the solver state handed to a running propagator.
#[derive(Debug)]
pub struct PropagationContext<'a, V> {
    pub(crate) variables: &'a mut V,
    pub(crate) events: &'a mut VariableEventQueue,
    pub(crate) environment: &'a mut Environment,
    pub(crate) sat: Option<&'a mut SatSolver>,
    pub(crate) propagator: PropagatorId,
    pub(crate) scope: &'a [VariableId],
    pub(crate) check_scope: bool,
    pub(crate) requests: &'a mut ContextRequests,
}

impl<V: VariableStore> PropagationContext<'_, V> {
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator
    }

    pub fn variables(&self) -> &V {
        self.variables
    }

    /// Mutable access to the domains. Every change made through it must be followed by a call
    /// to [`PropagationContext::notify`].
    pub fn variables_mut(&mut self) -> &mut V {
        self.variables
    }

    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        self.environment
    }

    pub fn world_index(&self) -> usize {
        self.environment.world_index()
    }

    /// The Boolean core attached to the engine, if any.
    pub fn sat(&self) -> Option<&SatSolver> {
        self.sat.as_deref()
    }

    pub fn sat_mut(&mut self) -> Option<&mut SatSolver> {
        self.sat.as_deref_mut()
    }

    /// Report that this propagator changed the domain of `variable`.
    pub fn notify(&mut self, variable: VariableId, event: DomainEvent) {
        quince_assert_simple!(
            !self.check_scope || self.scope.contains(&variable),
            "{} modified {variable}, which is not in its scope",
            self.propagator
        );
        self.events.on_variable_update(
            self.variables,
            variable,
            event,
            Cause::Propagator(self.propagator),
        );
    }

    /// Build the contradiction this propagator raises when its constraint cannot be satisfied.
    pub fn fail(&self, reason: &'static str) -> Contradiction {
        Contradiction::Propagator {
            propagator: self.propagator,
            reason,
        }
    }

    /// The constraint is entailed: the propagator will not be scheduled again until the search
    /// backtracks to before this point.
    pub fn set_passive(&mut self) {
        self.requests.passive = true;
    }

    /// Ask for a coarse propagation right after the current fine propagation pass.
    pub fn delay_full_propagation(&mut self) {
        self.requests.delayed_full_propagation = true;
    }
}
