mod clause_operation_error;
mod contradiction;
mod engine_error;
mod trail;

pub use clause_operation_error::ClauseOperationError;
pub use contradiction::Contradiction;
pub use contradiction::PropagationStatus;
pub use engine_error::EngineError;
pub(crate) use trail::Trail;
