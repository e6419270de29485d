use std::collections::VecDeque;
use std::fmt::Debug;

use log::debug;
use log::trace;

use super::termination::TerminationCondition;
use super::DynPropagators;
use super::EngineOptions;
use super::Environment;
use super::PriorityQueueBank;
use super::PropagationMode;
use super::TrailedInteger;
use super::VariableEventQueue;
use super::MAX_PRIORITIES;
use crate::asserts::warn_if_expensive_asserts;
use crate::basic_types::Contradiction;
use crate::basic_types::EngineError;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::propagation::ContextRequests;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorStore;
use crate::quince_assert_simple;
use crate::sat::SatSolver;
use crate::variables::Cause;
use crate::variables::DomainEvent;
use crate::variables::EventMask;
use crate::variables::Subscription;
use crate::variables::VariableId;
use crate::variables::VariableStore;

// The values of the trailed status of a propagator.
const NEW: i64 = 0;
const ACTIVE: i64 = 1;
const PASSIVE: i64 = 2;

/// How a call to [`PropagationEngine::propagate`] ended without a contradiction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationOutcome {
    /// No propagator is scheduled and no variable event is pending.
    Fixpoint,
    /// The termination condition triggered; scheduled propagators are left in their queues.
    Interrupted,
}

/// Counters describing the work done by a [`PropagationEngine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStatistics {
    /// The number of coarse propagator calls.
    pub num_propagations: u64,
    /// The number of fine (per-variable) propagator calls.
    pub num_fine_propagations: u64,
    /// The number of calls to [`PropagationEngine::propagate`] that reached a fixpoint.
    pub num_fixpoints: u64,
    /// The number of calls to [`PropagationEngine::propagate`] that ended in a contradiction.
    pub num_contradictions: u64,
}

/// The bookkeeping of an attached propagator.
#[derive(Clone, Debug)]
struct PropagatorState {
    /// Index into the list of attached propagators.
    position: usize,
    /// One of [`NEW`], [`ACTIVE`] or [`PASSIVE`]; restored when the environment backtracks.
    status: TrailedInteger,
    priority: Priority,
    /// The scope at the time the propagator was attached or last updated.
    scope: Vec<VariableId>,
    reacts_to_fine_events: bool,
    /// The events on each variable of the scope since the propagator last ran.
    pending_events: KeyedVec<LocalId, EventMask>,
    /// The variables with pending events, in the order they first changed.
    pending_order: VecDeque<LocalId>,
}

/// Runs propagators until no domain changes anymore.
///
/// The engine owns the scheduling state only: propagators live in a [`PropagatorStore`] and
/// variables in a [`VariableStore`], both borrowed for the duration of a call. The reversible
/// part of the state (whether a propagator is active or passive) lives in the [`Environment`].
///
/// A domain change reported through [`PropagationEngine::on_variable_update`] queues the changed
/// variable. Dispatching a variable schedules the propagators subscribed to it, in the queue of
/// their priority. [`PropagationEngine::propagate`] then repeatedly runs the propagator at the
/// front of the lowest non-empty queue; when and how many pending variables are dispatched in
/// between is decided by the [`PropagationMode`].
///
/// After a [`Contradiction`], the caller restores its domains and environment and calls
/// [`PropagationEngine::flush`] before propagating again.
pub struct PropagationEngine {
    options: EngineOptions,
    queues: PriorityQueueBank,
    variable_queue: VariableEventQueue,
    /// Propagators to run from scratch at the start of the next propagation.
    awake_queue: VecDeque<PropagatorId>,
    /// The attached propagators.
    propagators: Vec<PropagatorId>,
    states: KeyedVec<PropagatorId, Option<PropagatorState>>,
    dyn_propagators: DynPropagators,
    /// The propagator that is running, or that raised the last contradiction.
    last_propagator: Option<PropagatorId>,
    sat: Option<SatSolver>,
    termination: Option<Box<dyn TerminationCondition>>,
    initialized: bool,
    statistics: EngineStatistics,
}

impl Debug for PropagationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagationEngine")
            .field("options", &self.options)
            .field("queues", &self.queues)
            .field("variable_queue", &self.variable_queue)
            .field("awake_queue", &self.awake_queue)
            .field("propagators", &self.propagators)
            .field("last_propagator", &self.last_propagator)
            .field("initialized", &self.initialized)
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}

impl Default for PropagationEngine {
    fn default() -> Self {
        PropagationEngine::with_default_options()
    }
}

impl PropagationEngine {
    pub fn new(options: EngineOptions) -> PropagationEngine {
        warn_if_expensive_asserts();
        quince_assert_simple!(
            options.num_priorities >= 1 && options.num_priorities <= MAX_PRIORITIES,
            "the number of priorities must be between 1 and {MAX_PRIORITIES}"
        );

        PropagationEngine {
            options,
            queues: PriorityQueueBank::new(options.num_priorities),
            variable_queue: VariableEventQueue::default(),
            awake_queue: VecDeque::new(),
            propagators: Vec::new(),
            states: KeyedVec::default(),
            dyn_propagators: DynPropagators::default(),
            last_propagator: None,
            sat: options.boolean_core.then(SatSolver::default),
            termination: None,
            initialized: false,
            statistics: EngineStatistics::default(),
        }
    }

    pub fn with_default_options() -> PropagationEngine {
        PropagationEngine::new(EngineOptions::default())
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn statistics(&self) -> EngineStatistics {
        self.statistics
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn num_attached(&self) -> usize {
        self.propagators.len()
    }

    /// The number of propagators recorded for propagation from scratch on backtrack.
    pub fn num_dynamic(&self) -> usize {
        self.dyn_propagators.len()
    }

    pub fn is_attached(&self, propagator: PropagatorId) -> bool {
        self.state(propagator).is_some()
    }

    /// Whether the propagator waits in one of the priority queues.
    pub fn is_scheduled(&self, propagator: PropagatorId) -> bool {
        self.queues.is_enqueued(propagator)
    }

    /// Whether no propagator is scheduled and no variable event is pending.
    pub fn is_at_fixpoint(&self) -> bool {
        self.queues.is_empty() && self.variable_queue.is_empty()
    }

    /// Installs the condition polled before every propagator call.
    pub fn set_termination(&mut self, termination: Box<dyn TerminationCondition>) {
        self.termination = Some(termination);
    }

    pub fn clear_termination(&mut self) {
        self.termination = None;
    }

    /// Attaches a Boolean core which is propagated alongside the propagators. Returns the core
    /// that was attached before, if any.
    pub fn attach_sat(&mut self, sat: SatSolver) -> Option<SatSolver> {
        self.sat.replace(sat)
    }

    pub fn detach_sat(&mut self) -> Option<SatSolver> {
        self.sat.take()
    }

    pub fn sat(&self) -> Option<&SatSolver> {
        self.sat.as_ref()
    }

    pub fn sat_mut(&mut self) -> Option<&mut SatSolver> {
        self.sat.as_mut()
    }

    fn state(&self, propagator: PropagatorId) -> Option<&PropagatorState> {
        self.states.get(propagator).and_then(Option::as_ref)
    }

    fn state_mut(&mut self, propagator: PropagatorId) -> Option<&mut PropagatorState> {
        self.states.get_mut(propagator).and_then(Option::as_mut)
    }

    /// Whether the propagator is attached and active in the current world.
    pub fn is_active(&self, environment: &Environment, propagator: PropagatorId) -> bool {
        self.state(propagator)
            .is_some_and(|state| environment.read(state.status) == ACTIVE)
    }

    /// Stops scheduling the propagator until the environment backtracks past the current world.
    pub fn set_passive(
        &mut self,
        environment: &mut Environment,
        propagator: PropagatorId,
    ) -> Result<(), EngineError> {
        let state = self
            .state(propagator)
            .ok_or(EngineError::Detached(propagator))?;
        environment.assign(state.status, PASSIVE);
        self.clear_pending_events(propagator);
        self.queues.remove(propagator);
        Ok(())
    }

    /// Attaches every propagator of the store and queues them for their first propagation.
    ///
    /// With [`EngineOptions::sort_by_priority`] they are attached and first run by increasing
    /// priority, then by increasing scope size; otherwise in the order of the store.
    pub fn initialize<V: VariableStore + 'static>(
        &mut self,
        store: &PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
    ) -> Result<(), EngineError> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }

        let mut propagators = store.ids().collect::<Vec<_>>();
        for &propagator in propagators.iter() {
            let _ = self.check_priority(store, propagator)?;
        }
        if self.options.sort_by_priority {
            propagators.sort_by_key(|&propagator| {
                (store[propagator].priority(), store[propagator].scope().len())
            });
        }

        for &propagator in propagators.iter() {
            self.attach(store, variables, environment, propagator);
            self.awake_queue.push_back(propagator);
        }
        self.initialized = true;

        debug!("Initialised the engine with {} propagators", propagators.len());
        Ok(())
    }

    fn check_priority<V: VariableStore + 'static>(
        &self,
        store: &PropagatorStore<V>,
        propagator: PropagatorId,
    ) -> Result<Priority, EngineError> {
        let priority = store[propagator].priority();
        if priority.index() >= self.queues.num_priorities() {
            return Err(EngineError::PriorityOutOfRange {
                propagator,
                priority,
                num_priorities: self.options.num_priorities,
            });
        }
        Ok(priority)
    }

    fn attach<V: VariableStore + 'static>(
        &mut self,
        store: &PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
        propagator: PropagatorId,
    ) {
        let scope = store[propagator].scope().to_vec();
        subscribe(store, variables, propagator, &scope);

        let mut pending_events = KeyedVec::default();
        pending_events.resize(scope.len(), EventMask::empty());

        let state = PropagatorState {
            position: self.propagators.len(),
            status: environment.new_trailed_integer(NEW),
            priority: store[propagator].priority(),
            reacts_to_fine_events: store[propagator].reacts_to_fine_events(),
            scope,
            pending_events,
            pending_order: VecDeque::new(),
        };

        self.propagators.push(propagator);
        self.states.accomodate(propagator, None);
        self.states[propagator] = Some(state);
        trace!("Attached {} as {propagator}", store[propagator].name());
    }

    fn detach<V: VariableStore>(&mut self, variables: &mut V, propagator: PropagatorId) {
        let Some(state) = self.states.get_mut(propagator).and_then(Option::take) else {
            return;
        };

        for &variable in state.scope.iter() {
            variables.notifier_mut(variable).unsubscribe(propagator);
        }

        let _ = self.propagators.swap_remove(state.position);
        if let Some(&moved) = self.propagators.get(state.position) {
            if let Some(moved_state) = self.state_mut(moved) {
                moved_state.position = state.position;
            }
        }

        self.dyn_propagators.remove(propagator);
        self.queues.remove(propagator);
        self.awake_queue.retain(|&awake| awake != propagator);
        if self.last_propagator == Some(propagator) {
            self.last_propagator = None;
        }
    }

    /// Records a domain change. The variable is dispatched to its subscribed propagators later,
    /// during [`PropagationEngine::propagate`].
    pub fn on_variable_update<V: VariableStore>(
        &mut self,
        variables: &mut V,
        variable: VariableId,
        event: DomainEvent,
        cause: Cause,
    ) {
        if self.options.check_scope {
            if let Cause::Propagator(propagator) = cause {
                quince_assert_simple!(
                    self.state(propagator)
                        .map_or(true, |state| state.scope.contains(&variable)),
                    "{propagator} modified {variable}, which is not in its scope"
                );
            }
        }

        self.variable_queue
            .on_variable_update(variables, variable, event, cause);
    }

    /// Schedules the propagator as if `events` happened on the variable at `local_id`.
    pub fn schedule(
        &mut self,
        propagator: PropagatorId,
        local_id: LocalId,
        events: EventMask,
    ) -> Result<(), EngineError> {
        let state = self
            .state(propagator)
            .ok_or(EngineError::Detached(propagator))?;
        quince_assert_simple!(local_id.index() < state.scope.len());

        if !events.is_empty() {
            self.schedule_unchecked(propagator, local_id, events);
        }
        Ok(())
    }

    fn schedule_unchecked(
        &mut self,
        propagator: PropagatorId,
        local_id: LocalId,
        events: EventMask,
    ) {
        let Some(state) = self.states.get_mut(propagator).and_then(Option::as_mut) else {
            return;
        };

        if state.reacts_to_fine_events {
            if state.pending_events[local_id].is_empty() {
                state.pending_order.push_back(local_id);
            }
            state.pending_events[local_id] |= events;
        }

        if self.queues.enqueue(propagator, state.priority) {
            trace!("Scheduled {propagator}");
        }
    }

    /// Schedules every active subscriber of `variable` interested in its pending events, except
    /// the propagator that caused all of them, and clears the events.
    fn schedule_propagators<V: VariableStore>(
        &mut self,
        variables: &mut V,
        environment: &Environment,
        variable: VariableId,
    ) {
        let notifier = variables.notifier_mut(variable);
        let events = notifier.pending_events();
        let cause = notifier.pending_cause();
        trace!("Dispatching {variable} with {events:?}");

        if !events.is_empty() {
            for &Subscription {
                propagator,
                local_id,
                events: filter,
            } in notifier.subscriptions()
            {
                if cause == Cause::Propagator(propagator)
                    || filter.is_disjoint(events)
                    || !self.is_active(environment, propagator)
                {
                    continue;
                }
                self.schedule_unchecked(propagator, local_id, events);
            }
        }

        notifier.clear_events();
    }

    /// Dispatches the variable at the front of the variable event queue. Returns `false` if the
    /// queue is empty.
    fn dispatch_one<V: VariableStore>(
        &mut self,
        variables: &mut V,
        environment: &Environment,
    ) -> bool {
        let Some(variable) = self.variable_queue.pop() else {
            return false;
        };
        self.schedule_propagators(variables, environment, variable);
        true
    }

    fn dispatch_all<V: VariableStore>(&mut self, variables: &mut V, environment: &Environment) {
        while self.dispatch_one(variables, environment) {}
    }

    /// Turns pending variable events into scheduled propagators at the start of a round.
    fn manage_modifications<V: VariableStore>(
        &mut self,
        variables: &mut V,
        environment: &Environment,
    ) {
        match self.options.mode {
            PropagationMode::ConstraintOriented | PropagationMode::Hybrid => {
                self.dispatch_all(variables, environment)
            }
            PropagationMode::VariableOriented => {
                let _ = self.dispatch_one(variables, environment);
            }
        }
    }

    /// Propagates until a fixpoint, a contradiction or until the termination condition triggers.
    ///
    /// The attached Boolean core, if any, is propagated first and after every propagator call;
    /// a conflict in it is reported as [`Contradiction::Clause`].
    pub fn propagate<V: VariableStore + 'static>(
        &mut self,
        store: &mut PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
    ) -> Result<PropagationOutcome, Contradiction> {
        quince_assert_simple!(
            self.initialized,
            "the engine must be initialised before propagating"
        );
        trace!(
            "Propagating in world {} with {} scheduled propagators and {} pending variables",
            environment.world_index(),
            self.queues.len(),
            self.variable_queue.len()
        );

        let result = self.propagate_to_fixpoint(store, variables, environment);
        match result {
            Ok(PropagationOutcome::Fixpoint) => self.statistics.num_fixpoints += 1,
            Ok(PropagationOutcome::Interrupted) => {
                debug!("Propagation was interrupted by the termination condition")
            }
            Err(contradiction) => {
                self.statistics.num_contradictions += 1;
                debug!("Propagation failed: {contradiction}");
            }
        }
        result
    }

    fn propagate_to_fixpoint<V: VariableStore + 'static>(
        &mut self,
        store: &mut PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
    ) -> Result<PropagationOutcome, Contradiction> {
        self.synchronise_sat()?;
        self.activate_propagators(store, variables, environment)?;

        loop {
            self.manage_modifications(variables, environment);

            while !self.queues.is_empty() {
                if self
                    .termination
                    .as_mut()
                    .is_some_and(|termination| termination.should_stop())
                {
                    return Ok(PropagationOutcome::Interrupted);
                }

                let Some(propagator) = self.queues.pop() else {
                    break;
                };
                self.last_propagator = Some(propagator);
                self.run_scheduled(store, variables, environment, propagator)?;
                self.synchronise_sat()?;

                match self.options.mode {
                    PropagationMode::ConstraintOriented | PropagationMode::Hybrid => {
                        self.dispatch_all(variables, environment)
                    }
                    PropagationMode::VariableOriented => {}
                }
            }
            self.last_propagator = None;

            if self.variable_queue.is_empty() {
                return Ok(PropagationOutcome::Fixpoint);
            }
        }
    }

    /// Runs a propagator taken from the priority queues: its pending fine events one by one if
    /// it reacts to them, followed by a coarse call if the propagator asked for one; a coarse
    /// call otherwise.
    fn run_scheduled<V: VariableStore + 'static>(
        &mut self,
        store: &mut PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
        propagator: PropagatorId,
    ) -> PropagationStatus {
        let Some(state) = self.state(propagator) else {
            return Ok(());
        };

        if state.reacts_to_fine_events {
            let mut full_propagation = false;
            loop {
                let Some(state) = self.state_mut(propagator) else {
                    return Ok(());
                };
                if environment.read(state.status) != ACTIVE {
                    self.clear_pending_events(propagator);
                    return Ok(());
                }
                let Some(local_id) = state.pending_order.pop_front() else {
                    break;
                };
                let events = std::mem::take(&mut state.pending_events[local_id]);

                let requests =
                    self.run(store, variables, environment, propagator, Some((local_id, events)))?;
                full_propagation |= requests.delayed_full_propagation;
            }

            if full_propagation && self.is_active(environment, propagator) {
                let _ = self.run(store, variables, environment, propagator, None)?;
            }
        } else if self.is_active(environment, propagator) {
            let _ = self.run(store, variables, environment, propagator, None)?;
        }

        Ok(())
    }

    /// Calls the propagator once, coarsely or for a single fine event, and applies the requests
    /// it made.
    fn run<V: VariableStore + 'static>(
        &mut self,
        store: &mut PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
        propagator: PropagatorId,
        event: Option<(LocalId, EventMask)>,
    ) -> Result<ContextRequests, Contradiction> {
        let Some(state) = self.states.get(propagator).and_then(Option::as_ref) else {
            return Ok(ContextRequests::default());
        };
        let status = state.status;

        let mut requests = ContextRequests::default();
        let context = PropagationContext {
            variables: &mut *variables,
            events: &mut self.variable_queue,
            environment: &mut *environment,
            sat: self.sat.as_mut(),
            propagator,
            scope: &state.scope,
            check_scope: self.options.check_scope,
            requests: &mut requests,
        };

        let instance = &mut store[propagator];
        match event {
            Some((local_id, events)) => {
                trace!(
                    "Propagating {} ({propagator}) for local id {local_id} with {events:?}",
                    instance.name()
                );
                self.statistics.num_fine_propagations += 1;
                instance.propagate_event(context, local_id, events)?;
            }
            None => {
                trace!("Propagating {} ({propagator})", instance.name());
                self.statistics.num_propagations += 1;
                instance.propagate(context)?;
            }
        }

        if requests.passive {
            debug!("{propagator} is entailed and becomes passive");
            environment.assign(status, PASSIVE);
        }
        Ok(requests)
    }

    fn synchronise_sat(&mut self) -> PropagationStatus {
        match self.sat.as_mut() {
            Some(sat) if !sat.is_ok() => Err(Contradiction::Clause),
            Some(sat) => {
                if sat.propagate() {
                    Ok(())
                } else {
                    Err(Contradiction::Clause)
                }
            }
            None => Ok(()),
        }
    }

    /// Runs the propagators that must be propagated from scratch: those in the awake queue and
    /// the permanent dynamic propagators added or updated in the current world or in an
    /// abandoned one.
    pub fn activate_propagators<V: VariableStore + 'static>(
        &mut self,
        store: &mut PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
    ) -> PropagationStatus {
        let awake_queue = &mut self.awake_queue;
        self.dyn_propagators
            .descending(environment.world_index(), |propagator| {
                awake_queue.push_back(propagator)
            });

        while let Some(propagator) = self.awake_queue.pop_front() {
            self.execute(store, variables, environment, propagator)?;
        }
        Ok(())
    }

    /// Activates a new propagator, then propagates it coarsely if it is active and dispatches
    /// every pending variable.
    fn execute<V: VariableStore + 'static>(
        &mut self,
        store: &mut PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
        propagator: PropagatorId,
    ) -> PropagationStatus {
        let Some(state) = self.state(propagator) else {
            return Ok(());
        };
        let status = state.status;

        if environment.read(status) == NEW {
            environment.assign(status, ACTIVE);
        }
        if environment.read(status) == ACTIVE {
            self.last_propagator = Some(propagator);
            let _ = self.run(store, variables, environment, propagator, None)?;
            self.last_propagator = None;
            self.synchronise_sat()?;
            self.dispatch_all(variables, environment);
        }
        Ok(())
    }

    fn clear_pending_events(&mut self, propagator: PropagatorId) {
        if let Some(state) = self.state_mut(propagator) {
            for local_id in state.pending_order.drain(..) {
                state.pending_events[local_id] = EventMask::empty();
            }
        }
    }

    /// Drops every pending variable event without scheduling any propagator.
    pub fn ignore_modifications<V: VariableStore>(&mut self, variables: &mut V) {
        self.variable_queue.clear(variables);
    }

    /// Empties the variable event queue and the priority queues, forgetting every pending event.
    /// Must be called after a contradiction before propagating again.
    pub fn flush<V: VariableStore>(&mut self, variables: &mut V) {
        if let Some(propagator) = self.last_propagator.take() {
            self.clear_pending_events(propagator);
        }
        self.variable_queue.clear(variables);
        while let Some(propagator) = self.queues.pop() {
            self.clear_pending_events(propagator);
        }
    }

    /// [`PropagationEngine::flush`], and forget the propagators waiting for their first run.
    pub fn reset<V: VariableStore>(&mut self, variables: &mut V) {
        self.flush(variables);
        self.awake_queue.clear();
    }

    /// [`PropagationEngine::reset`], then detach every propagator. The engine must be
    /// initialised again before it can propagate.
    pub fn clear<V: VariableStore>(&mut self, variables: &mut V) {
        self.reset(variables);

        for propagator in std::mem::take(&mut self.propagators) {
            if let Some(state) = self.states[propagator].take() {
                for &variable in state.scope.iter() {
                    variables.notifier_mut(variable).unsubscribe(propagator);
                }
            }
        }
        self.dyn_propagators.clear();
        self.initialized = false;
        debug!("Cleared the engine");
    }

    /// Attaches propagators after initialisation.
    ///
    /// Permanent propagators are recorded with the current world and propagated from scratch
    /// on the next propagation and again whenever the search backtracks above that world.
    /// Temporary propagators only get their first propagation. Both stay attached and subscribed
    /// when the search backtracks above the world they were added in; the caller detaches them
    /// with [`PropagationEngine::dynamic_deletion`].
    pub fn dynamic_addition<V: VariableStore + 'static>(
        &mut self,
        store: &PropagatorStore<V>,
        variables: &mut V,
        environment: &mut Environment,
        permanent: bool,
        propagators: &[PropagatorId],
    ) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        for (index, &propagator) in propagators.iter().enumerate() {
            if !store.contains(propagator) {
                return Err(EngineError::UnknownPropagator(propagator));
            }
            if self.is_attached(propagator) || propagators[..index].contains(&propagator) {
                return Err(EngineError::AlreadyAttached(propagator));
            }
            let _ = self.check_priority(store, propagator)?;
        }

        let world = environment.world_index();
        for &propagator in propagators {
            self.attach(store, variables, environment, propagator);
            if permanent {
                self.dyn_propagators.add(propagator, world);
            } else {
                self.awake_queue.push_back(propagator);
            }
            debug!(
                "Added {} ({propagator}) in world {world}, permanent: {permanent}",
                store[propagator].name()
            );
        }
        Ok(())
    }

    /// Detaches propagators: they are unsubscribed from their variables and removed from every
    /// queue.
    pub fn dynamic_deletion<V: VariableStore>(
        &mut self,
        variables: &mut V,
        propagators: &[PropagatorId],
    ) -> Result<(), EngineError> {
        if let Some(&detached) = propagators
            .iter()
            .find(|&&propagator| !self.is_attached(propagator))
        {
            return Err(EngineError::Detached(detached));
        }

        for &propagator in propagators {
            self.detach(variables, propagator);
            debug!("Removed {propagator}");
        }
        Ok(())
    }

    /// Records that the propagator must be propagated from scratch the next time propagation
    /// starts in the current world or in a shallower one.
    pub fn propagate_on_backtrack(
        &mut self,
        environment: &Environment,
        propagator: PropagatorId,
    ) -> Result<(), EngineError> {
        if !self.is_attached(propagator) {
            return Err(EngineError::Detached(propagator));
        }
        self.dyn_propagators
            .add_or_update(propagator, environment.world_index());
        trace!("{propagator} will be propagated on backtrack");
        Ok(())
    }

    /// Re-reads the scope of a propagator whose variables changed. The propagator is subscribed
    /// to its new scope and, as with [`PropagationEngine::propagate_on_backtrack`], propagated
    /// from scratch at the start of the next propagation.
    pub fn update_involved_variables<V: VariableStore + 'static>(
        &mut self,
        store: &PropagatorStore<V>,
        variables: &mut V,
        environment: &Environment,
        propagator: PropagatorId,
    ) -> Result<(), EngineError> {
        let Some(state) = self.states.get_mut(propagator).and_then(Option::as_mut) else {
            return Err(EngineError::Detached(propagator));
        };

        for &variable in state.scope.iter() {
            variables.notifier_mut(variable).unsubscribe(propagator);
        }
        state.scope = store[propagator].scope().to_vec();
        subscribe(store, variables, propagator, &state.scope);

        state.pending_events.clear();
        state
            .pending_events
            .resize(state.scope.len(), EventMask::empty());
        state.pending_order.clear();
        self.queues.remove(propagator);

        self.propagate_on_backtrack(environment, propagator)
    }
}

fn subscribe<V: VariableStore + 'static>(
    store: &PropagatorStore<V>,
    variables: &mut V,
    propagator: PropagatorId,
    scope: &[VariableId],
) {
    for (index, &variable) in scope.iter().enumerate() {
        let local_id = LocalId::from(index as u32);
        variables.notifier_mut(variable).subscribe(Subscription {
            propagator,
            local_id,
            events: store[propagator].event_mask(local_id),
        });
    }
}
