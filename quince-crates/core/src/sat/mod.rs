//! The Boolean core: literals, clauses and [`SatSolver`], the clause database with
//! two-watched-literal unit propagation, together with the clause encodings of common Boolean
//! constraints.
mod clause;
mod clause_allocator;
mod encodings;
mod literal;
mod sat_solver;

pub use clause::Clause;
pub use clause::ClauseOrigin;
pub use clause::ClauseReference;
pub(crate) use clause_allocator::ClauseAllocator;
pub use literal::BooleanVariable;
pub use literal::Literal;
pub use sat_solver::SatSolver;
