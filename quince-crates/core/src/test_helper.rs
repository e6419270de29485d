//! Bounded integer variables and small propagators used by the unit tests of the engine.
use std::cell::RefCell;
use std::rc::Rc;

use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::variables::DomainEvent;
use crate::variables::EventMask;
use crate::variables::Variable;
use crate::variables::VariableId;
use crate::variables::VariableKind;
use crate::variables::VariableNotifier;
use crate::variables::VariableStore;

/// A shared record of which propagators ran, in order.
pub(crate) type Log = Rc<RefCell<Vec<String>>>;

#[derive(Clone, Debug)]
pub(crate) struct TestVariable {
    id: VariableId,
    lower_bound: i32,
    upper_bound: i32,
    notifier: VariableNotifier,
}

impl Variable for TestVariable {
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

/// Interval variables; domains are not backtracked, tests restore them with
/// [`TestVariables::restore_bounds`].
#[derive(Clone, Debug, Default)]
pub(crate) struct TestVariables {
    variables: KeyedVec<VariableId, TestVariable>,
}

impl TestVariables {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> VariableId {
        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(TestVariable {
            id,
            lower_bound,
            upper_bound,
            notifier: VariableNotifier::new(),
        })
    }

    pub(crate) fn lower_bound(&self, variable: VariableId) -> i32 {
        self.variables[variable].lower_bound
    }

    pub(crate) fn upper_bound(&self, variable: VariableId) -> i32 {
        self.variables[variable].upper_bound
    }

    /// Returns the event to report, if the bound changed.
    pub(crate) fn set_lower_bound(
        &mut self,
        variable: VariableId,
        value: i32,
    ) -> Result<Option<DomainEvent>, Contradiction> {
        let domain = &mut self.variables[variable];
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
        let domain = &mut self.variables[variable];
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

    pub(crate) fn bounds(&self) -> Vec<(i32, i32)> {
        self.variables
            .iter()
            .map(|variable| (variable.lower_bound, variable.upper_bound))
            .collect()
    }

    pub(crate) fn restore_bounds(&mut self, bounds: &[(i32, i32)]) {
        for (variable, &(lower_bound, upper_bound)) in self.variables.iter_mut().zip(bounds) {
            variable.lower_bound = lower_bound;
            variable.upper_bound = upper_bound;
        }
    }
}

impl VariableStore for TestVariables {
    fn num_variables(&self) -> usize {
        self.variables.len()
    }

    fn variable(&self, id: VariableId) -> &dyn Variable {
        &self.variables[id]
    }

    fn variable_mut(&mut self, id: VariableId) -> &mut dyn Variable {
        &mut self.variables[id]
    }
}

pub(crate) fn tighten_lower_bound(
    context: &mut PropagationContext<'_, TestVariables>,
    variable: VariableId,
    value: i32,
) -> PropagationStatus {
    if let Some(event) = context.variables_mut().set_lower_bound(variable, value)? {
        context.notify(variable, event);
    }
    Ok(())
}

pub(crate) fn tighten_upper_bound(
    context: &mut PropagationContext<'_, TestVariables>,
    variable: VariableId,
    value: i32,
) -> PropagationStatus {
    if let Some(event) = context.variables_mut().set_upper_bound(variable, value)? {
        context.notify(variable, event);
    }
    Ok(())
}

/// `x <= y`, passive once entailed.
pub(crate) struct LessOrEqual {
    pub(crate) name: String,
    pub(crate) scope: [VariableId; 2],
    pub(crate) log: Log,
}

impl LessOrEqual {
    pub(crate) fn new(name: &str, x: VariableId, y: VariableId, log: &Log) -> LessOrEqual {
        LessOrEqual {
            name: name.to_owned(),
            scope: [x, y],
            log: Rc::clone(log),
        }
    }
}

impl Propagator<TestVariables> for LessOrEqual {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        Priority::BINARY
    }

    fn propagate(
        &mut self,
        mut context: PropagationContext<'_, TestVariables>,
    ) -> PropagationStatus {
        self.log.borrow_mut().push(self.name.clone());
        let [x, y] = self.scope;

        let lower_bound = context.variables().lower_bound(x);
        tighten_lower_bound(&mut context, y, lower_bound)?;
        let upper_bound = context.variables().upper_bound(y);
        tighten_upper_bound(&mut context, x, upper_bound)?;

        if context.variables().upper_bound(x) <= context.variables().lower_bound(y) {
            context.set_passive();
        }
        Ok(())
    }
}

/// Does nothing but record when and how it is called: its name for a coarse call, or
/// `name:local_id` for a fine call.
pub(crate) struct Recorder {
    pub(crate) name: String,
    pub(crate) scope: Vec<VariableId>,
    pub(crate) priority: Priority,
    pub(crate) fine: bool,
    pub(crate) log: Log,
}

impl Recorder {
    pub(crate) fn new(name: &str, scope: &[VariableId], priority: Priority, log: &Log) -> Recorder {
        Recorder {
            name: name.to_owned(),
            scope: scope.to_vec(),
            priority,
            fine: false,
            log: Rc::clone(log),
        }
    }

    pub(crate) fn fine(mut self) -> Recorder {
        self.fine = true;
        self
    }
}

impl Propagator<TestVariables> for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn reacts_to_fine_events(&self) -> bool {
        self.fine
    }

    fn propagate(&mut self, _context: PropagationContext<'_, TestVariables>) -> PropagationStatus {
        self.log.borrow_mut().push(self.name.clone());
        Ok(())
    }

    fn propagate_event(
        &mut self,
        _context: PropagationContext<'_, TestVariables>,
        local_id: LocalId,
        _events: EventMask,
    ) -> PropagationStatus {
        self.log.borrow_mut().push(format!("{}:{local_id}", self.name));
        Ok(())
    }
}

/// Raises the lower bound of every variable in its scope by one, each time it runs.
pub(crate) struct Increment {
    pub(crate) name: String,
    pub(crate) scope: Vec<VariableId>,
    pub(crate) priority: Priority,
    pub(crate) log: Log,
}

impl Increment {
    pub(crate) fn new(
        name: &str,
        scope: &[VariableId],
        priority: Priority,
        log: &Log,
    ) -> Increment {
        Increment {
            name: name.to_owned(),
            scope: scope.to_vec(),
            priority,
            log: Rc::clone(log),
        }
    }
}

impl Propagator<TestVariables> for Increment {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn propagate(
        &mut self,
        mut context: PropagationContext<'_, TestVariables>,
    ) -> PropagationStatus {
        self.log.borrow_mut().push(self.name.clone());
        for &variable in self.scope.iter() {
            let lower_bound = context.variables().lower_bound(variable);
            tighten_lower_bound(&mut context, variable, lower_bound + 1)?;
        }
        Ok(())
    }
}

/// `x != value`, checked only once `x` is fixed.
pub(crate) struct NotEqualConstant {
    pub(crate) scope: [VariableId; 1],
    pub(crate) value: i32,
}

impl Propagator<TestVariables> for NotEqualConstant {
    fn name(&self) -> &str {
        "NotEqualConstant"
    }

    fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    fn priority(&self) -> Priority {
        Priority::UNARY
    }

    fn event_mask(&self, _local_id: LocalId) -> EventMask {
        DomainEvent::Instantiate.into()
    }

    fn propagate(&mut self, context: PropagationContext<'_, TestVariables>) -> PropagationStatus {
        let [x] = self.scope;
        let variables = context.variables();
        if variables.lower_bound(x) == self.value && variables.upper_bound(x) == self.value {
            return Err(context.fail("the variable is fixed to the forbidden value"));
        }
        Ok(())
    }
}
