//! A small interval domain store and a few propagators over it, used by the integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::cell::RefCell;
use std::rc::Rc;

use quince_core::engine::Environment;
use quince_core::engine::PropagationEngine;
use quince_core::propagation::Priority;
use quince_core::propagation::PropagationContext;
use quince_core::propagation::Propagator;
use quince_core::propagation::PropagatorStore;
use quince_core::sat::Literal;
use quince_core::variables::Cause;
use quince_core::variables::DomainEvent;
use quince_core::variables::Variable;
use quince_core::variables::VariableId;
use quince_core::variables::VariableKind;
use quince_core::variables::VariableNotifier;
use quince_core::variables::VariableStore;
use quince_core::Contradiction;
use quince_core::PropagationStatus;

pub(crate) type Trace = Rc<RefCell<Vec<String>>>;

pub(crate) fn new_trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn take(trace: &Trace) -> Vec<String> {
    std::mem::take(&mut *trace.borrow_mut())
}

#[derive(Debug)]
pub(crate) struct Interval {
    id: VariableId,
    lower_bound: i32,
    upper_bound: i32,
    notifier: VariableNotifier,
}

impl Variable for Interval {
    fn id(&self) -> VariableId {
        self.id
    }

    fn kind(&self) -> VariableKind {
        VariableKind::Integer
    }

    fn notifier(&self) -> &VariableNotifier {
        &self.notifier
    }

    fn notifier_mut(&mut self) -> &mut VariableNotifier {
        &mut self.notifier
    }
}

/// Interval domains with a snapshot-based undo stack, one snapshot per world.
#[derive(Debug, Default)]
pub(crate) struct Intervals {
    variables: Vec<Interval>,
    saved: Vec<Vec<(i32, i32)>>,
}

impl Intervals {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> VariableId {
        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(Interval {
            id,
            lower_bound,
            upper_bound,
            notifier: VariableNotifier::new(),
        });
        id
    }

    pub(crate) fn lower_bound(&self, variable: VariableId) -> i32 {
        self.variables[variable.unpack() as usize].lower_bound
    }

    pub(crate) fn upper_bound(&self, variable: VariableId) -> i32 {
        self.variables[variable.unpack() as usize].upper_bound
    }

    pub(crate) fn is_fixed(&self, variable: VariableId) -> bool {
        self.lower_bound(variable) == self.upper_bound(variable)
    }

    pub(crate) fn set_lower_bound(
        &mut self,
        variable: VariableId,
        value: i32,
    ) -> Result<Option<DomainEvent>, Contradiction> {
        let domain = &mut self.variables[variable.unpack() as usize];
        if value <= domain.lower_bound {
            return Ok(None);
        }
        if value > domain.upper_bound {
            return Err(Contradiction::EmptyDomain { variable });
        }
        domain.lower_bound = value;
        Ok(Some(if domain.lower_bound == domain.upper_bound {
            DomainEvent::Instantiate
        } else {
            DomainEvent::IncreaseLowerBound
        }))
    }

    pub(crate) fn set_upper_bound(
        &mut self,
        variable: VariableId,
        value: i32,
    ) -> Result<Option<DomainEvent>, Contradiction> {
        let domain = &mut self.variables[variable.unpack() as usize];
        if value >= domain.upper_bound {
            return Ok(None);
        }
        if value < domain.lower_bound {
            return Err(Contradiction::EmptyDomain { variable });
        }
        domain.upper_bound = value;
        Ok(Some(if domain.lower_bound == domain.upper_bound {
            DomainEvent::Instantiate
        } else {
            DomainEvent::DecreaseUpperBound
        }))
    }

    pub(crate) fn save(&mut self) {
        let bounds = self
            .variables
            .iter()
            .map(|domain| (domain.lower_bound, domain.upper_bound))
            .collect();
        self.saved.push(bounds);
    }

    pub(crate) fn restore(&mut self) {
        let bounds = self.saved.pop().expect("restore without a matching save");
        for (domain, (lower_bound, upper_bound)) in self.variables.iter_mut().zip(bounds) {
            domain.lower_bound = lower_bound;
            domain.upper_bound = upper_bound;
        }
    }
}

impl VariableStore for Intervals {
    fn num_variables(&self) -> usize {
        self.variables.len()
    }

    fn variable(&self, id: VariableId) -> &dyn Variable {
        &self.variables[id.unpack() as usize]
    }

    fn variable_mut(&mut self, id: VariableId) -> &mut dyn Variable {
        &mut self.variables[id.unpack() as usize]
    }
}

/// The model, the engine and the backtrackable state, moved through search together.
pub(crate) struct Model {
    pub(crate) engine: PropagationEngine,
    pub(crate) store: PropagatorStore<Intervals>,
    pub(crate) variables: Intervals,
    pub(crate) environment: Environment,
}

impl Model {
    pub(crate) fn new(engine: PropagationEngine) -> Model {
        Model {
            engine,
            store: PropagatorStore::new(),
            variables: Intervals::default(),
            environment: Environment::new(),
        }
    }

    pub(crate) fn initialize(&mut self) {
        self.engine
            .initialize(&self.store, &mut self.variables, &mut self.environment)
            .expect("valid model");
    }

    pub(crate) fn propagate(
        &mut self,
    ) -> Result<quince_core::engine::PropagationOutcome, Contradiction> {
        self.engine
            .propagate(&mut self.store, &mut self.variables, &mut self.environment)
    }

    pub(crate) fn push(&mut self) {
        self.environment.world_push();
        self.variables.save();
        if let Some(sat) = self.engine.sat_mut() {
            sat.push_trail_marker();
        }
    }

    pub(crate) fn pop(&mut self) {
        self.engine.flush(&mut self.variables);
        self.environment.world_pop();
        self.variables.restore();
        if let Some(sat) = self.engine.sat_mut() {
            let level = sat.decision_level();
            sat.cancel_until(level.saturating_sub(1));
        }
    }

    /// A decision on `x`.
    pub(crate) fn fix(&mut self, variable: VariableId, value: i32) -> PropagationStatus {
        for event in [
            self.variables.set_lower_bound(variable, value)?,
            self.variables.set_upper_bound(variable, value)?,
        ]
        .into_iter()
        .flatten()
        {
            self.engine
                .on_variable_update(&mut self.variables, variable, event, Cause::Null);
        }
        Ok(())
    }
}

fn tighten(
    context: &mut PropagationContext<'_, Intervals>,
    variable: VariableId,
    lower_bound: Option<i32>,
    upper_bound: Option<i32>,
) -> PropagationStatus {
    if let Some(value) = lower_bound {
        if let Some(event) = context.variables_mut().set_lower_bound(variable, value)? {
            context.notify(variable, event);
        }
    }
    if let Some(value) = upper_bound {
        if let Some(event) = context.variables_mut().set_upper_bound(variable, value)? {
            context.notify(variable, event);
        }
    }
    Ok(())
}

/// `x + offset <= y`
pub(crate) struct Linear {
    pub(crate) name: String,
    pub(crate) scope: [VariableId; 2],
    pub(crate) offset: i32,
    pub(crate) trace: Trace,
}

impl Linear {
    pub(crate) fn new(x: VariableId, offset: i32, y: VariableId, trace: &Trace) -> Linear {
        Linear {
            name: format!("{x}+{offset}<={y}"),
            scope: [x, y],
            offset,
            trace: Rc::clone(trace),
        }
    }
}

impl Propagator<Intervals> for Linear {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        Priority::BINARY
    }

    fn propagate(&mut self, mut context: PropagationContext<'_, Intervals>) -> PropagationStatus {
        self.trace.borrow_mut().push(self.name.clone());
        let [x, y] = self.scope;

        let lower_bound = context.variables().lower_bound(x) + self.offset;
        tighten(&mut context, y, Some(lower_bound), None)?;
        let upper_bound = context.variables().upper_bound(y) - self.offset;
        tighten(&mut context, x, None, Some(upper_bound))?;
        Ok(())
    }
}

/// Records its name when it runs; changes nothing.
pub(crate) struct Marker {
    pub(crate) name: String,
    pub(crate) scope: Vec<VariableId>,
    pub(crate) priority: Priority,
    pub(crate) trace: Trace,
}

impl Marker {
    pub(crate) fn new(
        name: &str,
        scope: &[VariableId],
        priority: Priority,
        trace: &Trace,
    ) -> Marker {
        Marker {
            name: name.to_owned(),
            scope: scope.to_vec(),
            priority,
            trace: Rc::clone(trace),
        }
    }
}

impl Propagator<Intervals> for Marker {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn propagate(&mut self, _context: PropagationContext<'_, Intervals>) -> PropagationStatus {
        self.trace.borrow_mut().push(self.name.clone());
        Ok(())
    }
}

/// Channels `x >= 1` into the literal `literal` of the attached Boolean core, and back.
pub(crate) struct Channel {
    pub(crate) scope: [VariableId; 1],
    pub(crate) literal: Literal,
}

impl Propagator<Intervals> for Channel {
    fn name(&self) -> &str {
        "Channel"
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn propagate(&mut self, mut context: PropagationContext<'_, Intervals>) -> PropagationStatus {
        let [x] = self.scope;
        let Some(value) = context.sat().map(|sat| sat.value_literal(self.literal)) else {
            return Ok(());
        };

        let implied = match value {
            Some(true) => return tighten(&mut context, x, Some(1), None),
            Some(false) => return tighten(&mut context, x, None, Some(0)),
            None if context.variables().lower_bound(x) >= 1 => self.literal,
            None if context.variables().upper_bound(x) <= 0 => !self.literal,
            None => return Ok(()),
        };
        if let Some(sat) = context.sat_mut() {
            let _ = sat.enqueue(implied);
        }
        Ok(())
    }
}
