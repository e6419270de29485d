use enumset::EnumSet;

use super::DomainEvent;
use super::EventMask;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// What caused a domain change.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Cause {
    /// An external change (a decision) or several different causes.
    Null,
    Propagator(PropagatorId),
}

/// A propagator watching a variable: `local_id` is the position of the variable in the scope of
/// the propagator and `events` filters which changes wake it up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub propagator: PropagatorId,
    pub local_id: LocalId,
    pub events: EventMask,
}

/// The engine-facing state of a variable.
///
/// Between two dispatches a variable accumulates the events raised on it. When the variable is
/// taken from the variable event queue, the accumulated mask is turned into scheduling requests
/// for every subscribed propagator, and then cleared.
#[derive(Clone, Debug, Default)]
pub struct VariableNotifier {
    scheduled: bool,
    pending: EventMask,
    cause: Option<Cause>,
    subscriptions: Vec<Subscription>,
}

impl VariableNotifier {
    pub fn new() -> VariableNotifier {
        VariableNotifier::default()
    }

    /// Whether the variable is currently in the variable event queue.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub(crate) fn set_scheduled(&mut self, scheduled: bool) {
        self.scheduled = scheduled;
    }

    pub fn pending_events(&self) -> EventMask {
        self.pending
    }

    /// The cause shared by every pending event; [`Cause::Null`] if there is none or if the
    /// events have different causes.
    pub fn pending_cause(&self) -> Cause {
        self.cause.unwrap_or(Cause::Null)
    }

    /// Records an event. The first event fixes the cause, a later event with another cause
    /// collapses it to [`Cause::Null`].
    pub fn store_event(&mut self, event: DomainEvent, cause: Cause) {
        match self.cause {
            None => self.cause = Some(cause),
            Some(stored) if stored != cause => self.cause = Some(Cause::Null),
            Some(_) => {}
        }
        let _ = self.pending.insert(event);
    }

    /// Forgets the pending events and leaves the variable unscheduled.
    pub fn clear_events(&mut self) {
        self.pending = EnumSet::empty();
        self.cause = None;
        self.scheduled = false;
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub(crate) fn subscribe(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub(crate) fn unsubscribe(&mut self, propagator: PropagatorId) {
        self.subscriptions
            .retain(|subscription| subscription.propagator != propagator);
    }
}
