//! Allocation errors.

/// Result type for allocation operations.
pub type Result<T> = std::result::Result<T, AllocationError>;

/// Errors raised by the allocation heuristics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// A precondition on the inputs does not hold
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
