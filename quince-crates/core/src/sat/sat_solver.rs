use std::io::Write;

use itertools::Itertools;
use log::debug;
use log::trace;

use super::BooleanVariable;
use super::Clause;
use super::ClauseAllocator;
use super::ClauseOrigin;
use super::ClauseReference;
use super::Literal;
use crate::basic_types::ClauseOperationError;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::quince_assert_advanced;
use crate::quince_assert_eq_simple;
use crate::quince_assert_moderate;
use crate::quince_assert_simple;

/// An entry of a watch list: the watched clause together with a literal of that clause which,
/// when true, shows the clause is satisfied without looking at the clause itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ClauseWatcher {
    blocker: Literal,
    clause_reference: ClauseReference,
}

/// The Boolean core: clause database, unit propagation and a leveled assignment trail.
///
/// Clauses are split by size. A unit clause is asserted immediately, a binary clause `a \/ b` is
/// stored as the two implications `~a => b` and `~b => a`, and longer clauses are watched with
/// the two-watched-literal scheme. During [`SatSolver::propagate`] the implications of a literal
/// are always examined before the clauses watching it.
///
/// Every structure is addressed by index (literal codes, variable indices, clause references),
/// so [`SatSolver::copy_from`] produces a clone that shares nothing with its source.
#[derive(Clone, Debug)]
pub struct SatSolver {
    /// `false` once the empty clause has been derived at the root.
    ok: bool,
    clauses: ClauseAllocator,
    original_clauses: Vec<ClauseReference>,
    learnt_clauses: Vec<ClauseReference>,
    /// Binary clauses added with [`SatSolver::add_clause`], in insertion order.
    original_binaries: Vec<[Literal; 2]>,
    /// `watch_lists[p]` holds the clauses that must be inspected when `p` becomes true, that is
    /// the clauses watching `~p`.
    watch_lists: KeyedVec<Literal, Vec<ClauseWatcher>>,
    /// `implications[p]` holds the literals that become true when `p` becomes true.
    implications: KeyedVec<Literal, Vec<Literal>>,
    assignment: KeyedVec<BooleanVariable, Option<bool>>,
    levels: KeyedVec<BooleanVariable, usize>,
    trail: Trail<Literal>,
    /// The next position on the trail to propagate.
    qhead: usize,
    /// Literals enqueued since the last [`SatSolver::clear_touched`], and the literals involved in
    /// a detected conflict.
    touched: Vec<Literal>,
}

impl Default for SatSolver {
    fn default() -> Self {
        SatSolver {
            ok: true,
            clauses: ClauseAllocator::default(),
            original_clauses: Vec::new(),
            learnt_clauses: Vec::new(),
            original_binaries: Vec::new(),
            watch_lists: KeyedVec::default(),
            implications: KeyedVec::default(),
            assignment: KeyedVec::default(),
            levels: KeyedVec::default(),
            trail: Trail::default(),
            qhead: 0,
            touched: Vec::new(),
        }
    }
}

fn literal_value(
    assignment: &KeyedVec<BooleanVariable, Option<bool>>,
    literal: Literal,
) -> Option<bool> {
    assignment[literal.variable()].map(|value| value == literal.is_positive())
}

impl SatSolver {
    pub fn new() -> SatSolver {
        SatSolver::default()
    }

    pub fn new_variable(&mut self) -> BooleanVariable {
        let variable = self.assignment.push(None);
        let _ = self.levels.push(0);
        for _ in 0..2 {
            let _ = self.watch_lists.push(Vec::new());
            let _ = self.implications.push(Vec::new());
        }
        variable
    }

    pub fn num_variables(&self) -> usize {
        self.assignment.len()
    }

    /// `false` once the core has been proven unsatisfiable; every further operation fails.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn value(&self, variable: BooleanVariable) -> Option<bool> {
        self.assignment[variable]
    }

    pub fn value_literal(&self, literal: Literal) -> Option<bool> {
        literal_value(&self.assignment, literal)
    }

    /// The decision level at which `variable` was assigned. Meaningless for unassigned variables.
    pub fn level_of(&self, variable: BooleanVariable) -> usize {
        self.levels[variable]
    }

    pub fn decision_level(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub fn trail(&self) -> &[Literal] {
        &self.trail
    }

    pub fn touched_literals(&self) -> &[Literal] {
        &self.touched
    }

    pub fn clear_touched(&mut self) {
        self.touched.clear();
    }

    /// The number of clauses of every size above one, original and learnt.
    pub fn num_clauses(&self) -> usize {
        self.original_clauses.len() + self.learnt_clauses.len() + self.original_binaries.len()
    }

    pub fn num_learnt(&self) -> usize {
        self.learnt_clauses.len()
    }

    /// The number of original binary clauses, each stored as two implications.
    pub fn num_implications(&self) -> usize {
        self.original_binaries.len()
    }

    pub fn learnt_clauses(&self) -> &[ClauseReference] {
        &self.learnt_clauses
    }

    pub fn clause(&self, clause_reference: ClauseReference) -> &Clause {
        &self.clauses[clause_reference]
    }

    /// The literals `literal` implies through binary clauses.
    pub fn implied_by(&self, literal: Literal) -> &[Literal] {
        &self.implications[literal]
    }

    /// Opens a new decision level.
    pub fn push_trail_marker(&mut self) {
        self.trail.new_checkpoint();
    }

    /// Undoes every assignment made above `level`. Does nothing if the core is not deeper than
    /// `level`.
    pub fn cancel_until(&mut self, level: usize) {
        if self.decision_level() <= level {
            return;
        }

        for literal in self.trail.synchronise(level) {
            self.assignment[literal.variable()] = None;
        }
        quince_assert_eq_simple!(level, self.decision_level());
        self.qhead = self.trail.len();
    }

    /// Makes `literal` true at the current level. Returns `false` if it is already false.
    pub fn enqueue(&mut self, literal: Literal) -> bool {
        match self.value_literal(literal) {
            Some(value) => value,
            None => {
                self.assign(literal);
                true
            }
        }
    }

    fn assign(&mut self, literal: Literal) {
        quince_assert_moderate!(self.value_literal(literal).is_none());

        let variable = literal.variable();
        self.assignment[variable] = Some(literal.is_positive());
        self.levels[variable] = self.decision_level();
        self.trail.push(literal);
        self.touched.push(literal);
    }

    pub fn add_empty_clause(&mut self) -> Result<(), ClauseOperationError> {
        self.add_clause(&[])
    }

    pub fn add_unit(&mut self, literal: Literal) -> Result<(), ClauseOperationError> {
        self.add_clause(&[literal])
    }

    pub fn add_binary(&mut self, a: Literal, b: Literal) -> Result<(), ClauseOperationError> {
        self.add_clause(&[a, b])
    }

    pub fn add_ternary(
        &mut self,
        a: Literal,
        b: Literal,
        c: Literal,
    ) -> Result<(), ClauseOperationError> {
        self.add_clause(&[a, b, c])
    }

    /// Adds a clause at the root.
    ///
    /// The clause is sorted and simplified against the root assignment first: a clause with a
    /// true literal, or with a literal and its negation, is satisfied and dropped; false and
    /// duplicate literals are removed. What remains is dispatched by size (empty: the core
    /// becomes unsatisfiable; unit: asserted and propagated; binary: stored as implications;
    /// longer: watched).
    pub fn add_clause(&mut self, literals: &[Literal]) -> Result<(), ClauseOperationError> {
        if !self.ok {
            return Err(ClauseOperationError::InfeasibleState);
        }
        if self.decision_level() != 0 {
            return Err(ClauseOperationError::NotAtRootLevel {
                level: self.decision_level(),
            });
        }

        let mut canonical: Vec<Literal> = Vec::with_capacity(literals.len());
        for literal in literals.iter().copied().sorted_unstable().dedup() {
            match self.value_literal(literal) {
                Some(true) => return Ok(()),
                Some(false) => continue,
                None => {}
            }
            if canonical.last() == Some(&!literal) {
                return Ok(());
            }
            canonical.push(literal);
        }

        match canonical.len() {
            0 => {
                debug!("The empty clause was added, the Boolean core is unsatisfiable");
                self.ok = false;
                Err(ClauseOperationError::InfeasibleClause)
            }
            1 => {
                self.assign(canonical[0]);
                if self.propagate() {
                    Ok(())
                } else {
                    debug!("Unit clause {} is infeasible at the root", canonical[0]);
                    self.ok = false;
                    Err(ClauseOperationError::InfeasibleClause)
                }
            }
            2 => {
                let (a, b) = (canonical[0], canonical[1]);
                self.add_implications(a, b);
                self.original_binaries.push([a, b]);
                Ok(())
            }
            _ => {
                let clause_reference = self
                    .clauses
                    .create_clause(canonical, ClauseOrigin::Original);
                self.original_clauses.push(clause_reference);
                self.attach_clause(clause_reference);
                Ok(())
            }
        }
    }

    /// Adds a clause derived by conflict analysis to the learnt store.
    ///
    /// No simplification is applied. A unit clause is asserted at the current level and
    /// propagated. A longer clause is stored so that it can later be removed with
    /// [`SatSolver::detach_learnt`]; if it is unit under the current assignment its remaining
    /// literal is enqueued (but not propagated).
    ///
    /// Returns [`ClauseOperationError::InfeasibleClause`] if the clause is empty or if asserting a
    /// unit clause leads to a conflict; at the root this makes the core unsatisfiable.
    pub fn learn_clause(
        &mut self,
        literals: &[Literal],
    ) -> Result<Option<ClauseReference>, ClauseOperationError> {
        self.learn(literals, ClauseOrigin::Learnt)
    }

    /// Like [`SatSolver::learn_clause`], but the clause is removed by the next call to
    /// [`SatSolver::retract_clauses`].
    pub fn learn_retractable_clause(
        &mut self,
        literals: &[Literal],
    ) -> Result<Option<ClauseReference>, ClauseOperationError> {
        self.learn(literals, ClauseOrigin::Retractable)
    }

    fn learn(
        &mut self,
        literals: &[Literal],
        origin: ClauseOrigin,
    ) -> Result<Option<ClauseReference>, ClauseOperationError> {
        if !self.ok {
            return Err(ClauseOperationError::InfeasibleState);
        }

        match literals.len() {
            0 => {
                self.ok = false;
                Err(ClauseOperationError::InfeasibleClause)
            }
            1 => {
                if self.enqueue(literals[0]) && self.propagate() {
                    Ok(None)
                } else {
                    if self.decision_level() == 0 {
                        debug!("Learnt unit {} is infeasible at the root", literals[0]);
                        self.ok = false;
                    }
                    Err(ClauseOperationError::InfeasibleClause)
                }
            }
            _ => {
                let mut literals = literals.to_vec();
                self.order_for_watching(&mut literals);

                let clause_reference = self.clauses.create_clause(literals, origin);
                self.learnt_clauses.push(clause_reference);
                if self.clauses[clause_reference].len() == 2 {
                    let clause = &self.clauses[clause_reference];
                    let (a, b) = (clause[0], clause[1]);
                    self.add_implications(a, b);
                } else {
                    self.attach_clause(clause_reference);
                }
                trace!("Learnt {}", self.clauses[clause_reference]);

                let first = self.clauses[clause_reference][0];
                let second = self.clauses[clause_reference][1];
                quince_assert_moderate!(
                    self.value_literal(first) != Some(false),
                    "learnt clauses must not be conflicting when they are added"
                );
                if self.value_literal(first).is_none() && self.value_literal(second) == Some(false)
                {
                    self.assign(first);
                }

                Ok(Some(clause_reference))
            }
        }
    }

    /// Puts the non-false literals first, followed by the false literals from the most recently
    /// assigned level down, so the two watched literals are the right ones to watch after a
    /// backtrack.
    fn order_for_watching(&self, literals: &mut [Literal]) {
        literals.sort_by_key(|&literal| match self.value_literal(literal) {
            Some(false) => (1, usize::MAX - self.levels[literal.variable()]),
            _ => (0, 0),
        });
    }

    /// Removes a learnt clause from the core.
    pub fn detach_learnt(&mut self, clause_reference: ClauseReference) {
        let position = self
            .learnt_clauses
            .iter()
            .position(|&learnt| learnt == clause_reference);
        quince_assert_simple!(
            position.is_some(),
            "{clause_reference} is not a learnt clause"
        );
        let Some(position) = position else {
            return;
        };
        let _ = self.learnt_clauses.swap_remove(position);

        let clause = &self.clauses[clause_reference];
        quince_assert_simple!(clause.origin().is_learnt());
        let (first, second) = (clause[0], clause[1]);
        if clause.len() == 2 {
            Self::remove_first(&mut self.implications[!first], second);
            Self::remove_first(&mut self.implications[!second], first);
        } else {
            for watched in [first, second] {
                let watchers = &mut self.watch_lists[!watched];
                if let Some(index) = watchers
                    .iter()
                    .rposition(|watcher| watcher.clause_reference == clause_reference)
                {
                    let _ = watchers.swap_remove(index);
                }
            }
        }

        self.clauses.delete_clause(clause_reference);
        trace!(
            "Detached {clause_reference}, {} clauses left in the arena",
            self.clauses.num_live_clauses()
        );
    }

    /// Detaches every clause learnt with [`SatSolver::learn_retractable_clause`].
    pub fn retract_clauses(&mut self) {
        let retractable = self
            .learnt_clauses
            .iter()
            .copied()
            .filter(|&learnt| self.clauses[learnt].origin() == ClauseOrigin::Retractable)
            .collect::<Vec<_>>();

        for clause_reference in retractable {
            self.detach_learnt(clause_reference);
        }
    }

    fn remove_first(literals: &mut Vec<Literal>, literal: Literal) {
        if let Some(index) = literals.iter().rposition(|&implied| implied == literal) {
            let _ = literals.swap_remove(index);
        }
    }

    fn add_implications(&mut self, a: Literal, b: Literal) {
        self.implications[!a].push(b);
        self.implications[!b].push(a);
    }

    fn attach_clause(&mut self, clause_reference: ClauseReference) {
        let clause = &self.clauses[clause_reference];
        quince_assert_simple!(clause.len() >= 3);

        let (first, second) = (clause[0], clause[1]);
        self.watch_lists[!first].push(ClauseWatcher {
            blocker: second,
            clause_reference,
        });
        self.watch_lists[!second].push(ClauseWatcher {
            blocker: first,
            clause_reference,
        });
    }

    /// Asserts `literal` on a new decision level and propagates.
    ///
    /// Pending assignments are propagated first. If `literal` is already true a new (empty) level
    /// is still opened, so that every successful call can be undone with one level of
    /// backtracking. Returns `false` on a conflict, including when `literal` is already false.
    pub fn propagate_one_literal(&mut self, literal: Literal) -> bool {
        quince_assert_simple!(self.ok);
        self.clear_touched();

        if !self.propagate() {
            return false;
        }

        match self.value_literal(literal) {
            Some(true) => {
                self.push_trail_marker();
                true
            }
            Some(false) => false,
            None => {
                self.push_trail_marker();
                self.assign(literal);
                self.propagate()
            }
        }
    }

    /// Unit propagation of every assignment not propagated yet.
    ///
    /// Returns `false` as soon as a conflict is found; the remaining assignments are then left
    /// unpropagated.
    pub fn propagate(&mut self) -> bool {
        while self.qhead < self.trail.len() {
            let true_literal = self.trail[self.qhead];
            self.qhead += 1;

            if !self.propagate_implications(true_literal)
                || !self.propagate_clauses(true_literal)
            {
                self.qhead = self.trail.len();
                return false;
            }
        }

        quince_assert_advanced!(self.debug_check_propagation_complete());
        true
    }

    fn propagate_implications(&mut self, true_literal: Literal) -> bool {
        for index in 0..self.implications[true_literal].len() {
            let implied = self.implications[true_literal][index];
            match self.value_literal(implied) {
                Some(true) => {}
                Some(false) => {
                    self.touched.push(implied);
                    return false;
                }
                None => self.assign(implied),
            }
        }
        true
    }

    fn propagate_clauses(&mut self, true_literal: Literal) -> bool {
        let false_literal = !true_literal;

        if self.watch_lists[true_literal].is_empty() {
            return true;
        }

        // The watch list is compacted in place: watchers that stay are copied to `end_index`,
        // watchers that move to another literal are skipped.
        let mut end_index: usize = 0;
        let mut current_index: usize = 0;
        while current_index < self.watch_lists[true_literal].len() {
            let watcher = self.watch_lists[true_literal][current_index];
            current_index += 1;

            if literal_value(&self.assignment, watcher.blocker) == Some(true) {
                self.watch_lists[true_literal][end_index] = watcher;
                end_index += 1;
                continue;
            }

            let clause_reference = watcher.clause_reference;
            let clause = &mut self.clauses[clause_reference];

            if clause[0] == false_literal {
                clause.swap(0, 1);
            }
            quince_assert_moderate!(clause[1] == false_literal);

            let first = clause[0];
            let kept_watcher = ClauseWatcher {
                blocker: first,
                clause_reference,
            };
            if first != watcher.blocker && literal_value(&self.assignment, first) == Some(true) {
                self.watch_lists[true_literal][end_index] = kept_watcher;
                end_index += 1;
                continue;
            }

            let replacement = (2..clause.len())
                .find(|&index| literal_value(&self.assignment, clause[index]) != Some(false));
            if let Some(index) = replacement {
                clause.swap(1, index);
                let new_watched = clause[1];
                self.watch_lists[!new_watched].push(kept_watcher);
                continue;
            }

            // Every literal but the first is false.
            self.watch_lists[true_literal][end_index] = kept_watcher;
            end_index += 1;

            if literal_value(&self.assignment, first) == Some(false) {
                self.touched.push(first);
                while current_index < self.watch_lists[true_literal].len() {
                    self.watch_lists[true_literal][end_index] =
                        self.watch_lists[true_literal][current_index];
                    current_index += 1;
                    end_index += 1;
                }
                self.watch_lists[true_literal].truncate(end_index);
                return false;
            }

            self.assign(first);
        }

        self.watch_lists[true_literal].truncate(end_index);
        true
    }

    /// Replaces the whole state of this core by a deep copy of `other`.
    pub fn copy_from(&mut self, other: &SatSolver) {
        self.clone_from(other);
    }

    /// Removes every clause and every assignment. Variables are kept.
    pub fn clear(&mut self) {
        debug!("Clearing the Boolean core");
        self.ok = true;
        self.clauses.clear();
        self.original_clauses.clear();
        self.learnt_clauses.clear();
        self.original_binaries.clear();
        self.watch_lists.iter_mut().for_each(Vec::clear);
        self.implications.iter_mut().for_each(Vec::clear);
        self.assignment.iter_mut().for_each(|value| *value = None);
        self.trail.clear();
        self.qhead = 0;
        self.touched.clear();
    }

    /// The clauses of the core, as literal lists: the root assignment as unit clauses, then the
    /// binary, original and learnt clauses. An unsatisfiable core yields the empty clause.
    pub fn clauses(&self) -> Vec<Vec<Literal>> {
        if !self.ok {
            return vec![vec![]];
        }

        self.trail
            .values_at_checkpoint(0)
            .iter()
            .map(|&literal| vec![literal])
            .chain(self.original_binaries.iter().map(|binary| binary.to_vec()))
            .chain(
                self.original_clauses
                    .iter()
                    .chain(self.learnt_clauses.iter())
                    .map(|&clause_reference| self.clauses[clause_reference].literals().to_vec()),
            )
            .collect()
    }

    /// Writes the clauses returned by [`SatSolver::clauses`] in DIMACS CNF.
    pub fn write_dimacs(&self, mut writer: impl Write) -> std::io::Result<()> {
        let clauses = self.clauses();
        writeln!(writer, "p cnf {} {}", self.num_variables(), clauses.len())?;
        for clause in clauses {
            let line = clause
                .iter()
                .map(|literal| literal.to_dimacs().to_string())
                .chain(std::iter::once("0".to_owned()))
                .join(" ");
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    fn debug_check_propagation_complete(&self) -> bool {
        let falsified_or_unit = |literals: &[Literal]| {
            let non_false = literals
                .iter()
                .filter(|&&literal| self.value_literal(literal) != Some(false))
                .collect::<Vec<_>>();
            match non_false.as_slice() {
                [] => true,
                [only] => self.value_literal(**only).is_none(),
                _ => false,
            }
        };

        self.original_binaries
            .iter()
            .map(|binary| binary.to_vec())
            .chain(
                self.original_clauses
                    .iter()
                    .chain(self.learnt_clauses.iter())
                    .map(|&clause_reference| self.clauses[clause_reference].literals().to_vec()),
            )
            .all(|literals| !falsified_or_unit(&literals))
    }
}
