use std::ops::Index;
use std::ops::IndexMut;

use super::Literal;
use crate::containers::StorageKey;
use crate::quince_assert_moderate;

/// How a clause entered the Boolean core.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ClauseOrigin {
    /// Added with [`super::SatSolver::add_clause`]; never removed.
    Original,
    /// Learnt permanently; may be detached by a clause deletion policy.
    Learnt,
    /// Learnt temporarily; detached in bulk by [`super::SatSolver::retract_clauses`].
    Retractable,
}

impl ClauseOrigin {
    pub fn is_learnt(self) -> bool {
        !matches!(self, ClauseOrigin::Original)
    }
}

/// A handle to a clause stored in the Boolean core.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClauseReference {
    id: u32,
}

impl StorageKey for ClauseReference {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ClauseReference { id: index as u32 }
    }
}

impl std::fmt::Display for ClauseReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.id)
    }
}

/// A disjunction of literals. The first two positions hold the watched literals; swapping
/// literals in and out of those positions is the only change a clause undergoes.
#[derive(Clone, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
    origin: ClauseOrigin,
    is_deleted: bool,
}

impl Clause {
    pub(crate) fn new(literals: Vec<Literal>, origin: ClauseOrigin) -> Clause {
        quince_assert_moderate!(literals.len() >= 2);
        Clause {
            literals,
            origin,
            is_deleted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn origin(&self) -> ClauseOrigin {
        self.origin
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub(crate) fn mark_deleted(&mut self) {
        quince_assert_moderate!(!self.is_deleted);
        self.is_deleted = true;
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.literals.swap(a, b);
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Literal {
        &self.literals[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Literal {
        &mut self.literals[index]
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (index, literal) in self.literals.iter().enumerate() {
            if index > 0 {
                write!(f, " \\/ ")?;
            }
            write!(f, "{literal}")?;
        }
        write!(f, ")[{:?}]", self.origin)
    }
}
