use std::collections::VecDeque;

use log::trace;

use crate::variables::Cause;
use crate::variables::DomainEvent;
use crate::variables::VariableId;
use crate::variables::VariableStore;

/// The variables with events that have not been dispatched to propagators yet.
///
/// Membership is mirrored by the `scheduled` flag of each variable's notifier, so a variable is
/// queued at most once no matter how many events it accumulates.
#[derive(Debug, Default, Clone)]
pub(crate) struct VariableEventQueue {
    queue: VecDeque<VariableId>,
}

impl VariableEventQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Records `event` on `variable` and queues the variable if it is not queued yet.
    pub(crate) fn on_variable_update<Variables: VariableStore + ?Sized>(
        &mut self,
        variables: &mut Variables,
        variable: VariableId,
        event: DomainEvent,
        cause: Cause,
    ) {
        let notifier = variables.notifier_mut(variable);
        notifier.store_event(event, cause);

        if !notifier.is_scheduled() {
            notifier.set_scheduled(true);
            self.queue.push_back(variable);
            trace!("{variable} queued after {event:?} (cause {cause:?})");
        }
    }

    pub(crate) fn pop(&mut self) -> Option<VariableId> {
        self.queue.pop_front()
    }

    /// Drops every queued variable together with its pending events.
    pub(crate) fn clear<Variables: VariableStore + ?Sized>(&mut self, variables: &mut Variables) {
        for variable in self.queue.drain(..) {
            variables.notifier_mut(variable).clear_events();
        }
    }
}
