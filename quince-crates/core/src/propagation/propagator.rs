use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enumset::EnumSet;

use super::LocalId;
use super::PropagationContext;
use super::Priority;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::engine::PropagationEngine;
use crate::variables::EventMask;
use crate::variables::VariableId;
use crate::variables::VariableStore;

// Allows retrieving the concrete propagator from a `Box<dyn Propagator<V>>`, see
// `PropagatorStore::get`.
impl_downcast!(Propagator<V> where V: VariableStore);

/// A propagator removes values from domains which cannot be part of any solution, or reports a
/// [`crate::Contradiction`].
///
/// The only required functions are [`Propagator::name`], [`Propagator::scope`] and
/// [`Propagator::propagate`]. Propagators are not required to reach a fixpoint on their own: the
/// engine calls them again as long as the domains of their variables keep changing.
pub trait Propagator<V: VariableStore>: Downcast {
    /// Return the name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// The variables this propagator reads or writes. The index of a variable in this slice is
    /// its [`LocalId`].
    ///
    /// The engine reads the scope when the propagator is attached and when
    /// [`PropagationEngine::update_involved_variables`] is called.
    fn scope(&self) -> &[VariableId];

    /// See [`Priority`]. By default propagators are considered expensive.
    fn priority(&self) -> Priority {
        Priority::VERY_SLOW
    }

    /// The events on the variable at `local_id` that should schedule this propagator. By default
    /// every event does.
    fn event_mask(&self, _local_id: LocalId) -> EventMask {
        EnumSet::all()
    }

    /// Whether the engine should call [`Propagator::propagate_event`] once per changed variable
    /// instead of [`Propagator::propagate`].
    fn reacts_to_fine_events(&self) -> bool {
        false
    }

    /// Coarse propagation: re-evaluate the constraint from the current domains.
    fn propagate(&mut self, context: PropagationContext<'_, V>) -> PropagationStatus;

    /// Fine propagation: the variable at `local_id` changed with the given `events` since the
    /// propagator last ran.
    ///
    /// By default this performs coarse propagation.
    fn propagate_event(
        &mut self,
        context: PropagationContext<'_, V>,
        _local_id: LocalId,
        _events: EventMask,
    ) -> PropagationStatus {
        self.propagate(context)
    }
}
