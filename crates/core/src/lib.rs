//! EventDesk core data models.
//!
//! Tasks, team members, and the records the task-allocation heuristics and
//! the model-backed assistant produce. This crate performs no I/O.

#![warn(missing_docs)]

// Identities
mod id;

// Records supplied by the data store
mod task;
mod member;
mod board;

// Records produced by the allocation layer
mod advice;

mod error;

pub use id::{MemberId, TaskId};
pub use task::{Hours, Priority, Task, TaskStatus};
pub use member::TeamMember;
pub use board::Board;
pub use advice::{
    check_score, AllocationResult, MemberWorkload, ReassignmentSuggestion, RecommendationResult,
    RecommendedTask, WorkloadClass, WorkloadReport,
};
pub use error::ValidationError;
