use super::Clause;
use super::ClauseOrigin;
use super::ClauseReference;
use super::Literal;
use crate::containers::KeyedVec;
use crate::quince_assert_advanced;
use crate::quince_assert_moderate;

/// Arena of clauses addressed by [`ClauseReference`]. Slots of deleted clauses are reused.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClauseAllocator {
    allocated_clauses: KeyedVec<ClauseReference, Clause>,
    deleted_clause_ids: Vec<ClauseReference>,
}

impl ClauseAllocator {
    pub(crate) fn create_clause(
        &mut self,
        literals: Vec<Literal>,
        origin: ClauseOrigin,
    ) -> ClauseReference {
        let clause = Clause::new(literals, origin);

        match self.deleted_clause_ids.pop() {
            Some(clause_reference) => {
                self.allocated_clauses[clause_reference] = clause;
                clause_reference
            }
            None => self.allocated_clauses.push(clause),
        }
    }

    pub(crate) fn delete_clause(&mut self, clause_reference: ClauseReference) {
        quince_assert_advanced!(
            !self.deleted_clause_ids.contains(&clause_reference),
            "the clause is deleted twice"
        );
        self.allocated_clauses[clause_reference].mark_deleted();
        self.deleted_clause_ids.push(clause_reference);
    }

    pub(crate) fn num_live_clauses(&self) -> usize {
        self.allocated_clauses.len() - self.deleted_clause_ids.len()
    }

    pub(crate) fn clear(&mut self) {
        self.allocated_clauses.clear();
        self.deleted_clause_ids.clear();
    }
}

impl std::ops::Index<ClauseReference> for ClauseAllocator {
    type Output = Clause;

    fn index(&self, clause_reference: ClauseReference) -> &Clause {
        let clause = &self.allocated_clauses[clause_reference];
        quince_assert_moderate!(!clause.is_deleted());
        clause
    }
}

impl std::ops::IndexMut<ClauseReference> for ClauseAllocator {
    fn index_mut(&mut self, clause_reference: ClauseReference) -> &mut Clause {
        &mut self.allocated_clauses[clause_reference]
    }
}
