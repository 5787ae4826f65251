//! Task allocation heuristics.
//!
//! Deterministic fallbacks used when the generative model is unavailable or
//! returns something unusable: single-task assignment, personal task
//! recommendations, and team workload balancing. Everything here is a pure
//! function of its inputs.

#![warn(missing_docs)]

pub mod assignment;
pub mod error;
pub mod matcher;
pub mod policy;
pub mod workload;

pub use assignment::AssignmentRecommender;
pub use error::{AllocationError, Result};
pub use matcher::PersonalTaskMatcher;
pub use policy::AllocationPolicy;
pub use workload::WorkloadBalancer;
