//! Boundary validation errors.

use crate::id::{MemberId, TaskId};

/// Errors raised when externally supplied records are malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Estimated hours must be finite and positive
    #[error("estimated hours must be a positive number, got {0}")]
    InvalidHours(f64),

    /// Scores must be finite and within [0, 1]
    #[error("score must be within [0, 1], got {0}")]
    InvalidScore(f64),

    /// The same task id appears twice
    #[error("duplicate task id: {0}")]
    DuplicateTask(TaskId),

    /// The same member id appears twice
    #[error("duplicate member id: {0}")]
    DuplicateMember(MemberId),

    /// Referenced task does not exist
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),

    /// Referenced member does not exist
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),

    /// Completed tasks cannot be reassigned
    #[error("task already completed: {0}")]
    TaskCompleted(TaskId),
}
