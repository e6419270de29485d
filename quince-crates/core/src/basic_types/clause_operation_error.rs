use thiserror::Error;

/// Errors returned when adding clauses to the Boolean core.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClauseOperationError {
    #[error("clauses can only be added at the root, the core is at decision level {level}")]
    NotAtRootLevel { level: usize },
    #[error("adding the clause failed because it is infeasible at the root")]
    InfeasibleClause,
    #[error("adding the clause failed because the Boolean core is in an infeasible state")]
    InfeasibleState,
}
