//! Records produced by the allocation heuristics and the model-backed assistant.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{MemberId, TaskId};

/// Who should take a task, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// One or two assignees, primary first
    pub assigned_to: Vec<MemberId>,

    /// Human-readable explanation
    pub reasoning: String,

    /// Human-readable scheduling advice
    pub suggested_timeline: String,

    /// Heuristic confidence in [0, 1]
    pub confidence_score: f64,
}

/// One task suggested to a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedTask {
    /// Suggested task
    pub task_id: TaskId,

    /// Human-readable explanation
    pub reasoning: String,

    /// Heuristic fit in [0, 1]
    pub fit_score: f64,
}

/// Ranked task suggestions for one member, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    /// At most three entries
    pub recommended_tasks: Vec<RecommendedTask>,
}

impl RecommendationResult {
    /// Whether there is nothing to recommend.
    pub fn is_empty(&self) -> bool {
        self.recommended_tasks.is_empty()
    }
}

/// Workload bucket for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkloadClass {
    /// Too much on their plate
    Overloaded,
    /// Has spare capacity
    Underutilized,
    /// Neither
    Balanced,
}

/// Derived load figures for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWorkload {
    /// Member
    pub member_id: MemberId,
    /// Active (non-completed) tasks assigned to the member
    pub task_count: usize,
    /// Sum of active task hours divided by the policy divisor
    pub workload_score: f64,
    /// Bucket
    pub class: WorkloadClass,
}

/// Suggested move of a task from an overloaded member to one with capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignmentSuggestion {
    /// Task to move
    pub task_id: TaskId,
    /// Current assignee
    pub from_member: MemberId,
    /// Proposed assignee
    pub to_member: MemberId,
    /// Human-readable explanation
    pub reasoning: String,
}

/// Team-wide workload classification and redistribution advice.
///
/// The three buckets partition the roster: every member id appears in
/// exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    /// Members over the load thresholds
    pub overloaded: Vec<MemberId>,
    /// Members under the capacity thresholds
    pub underutilized: Vec<MemberId>,
    /// Everyone else
    pub balanced: Vec<MemberId>,
    /// Per-member figures, in roster order (empty for model-backed reports)
    #[serde(default)]
    pub members: Vec<MemberWorkload>,
    /// Redistribution moves
    pub suggestions: Vec<ReassignmentSuggestion>,
    /// Summary sentence
    pub summary: String,
}

impl WorkloadReport {
    /// Bucket a member was placed in, if present.
    pub fn class_of(&self, member: &MemberId) -> Option<WorkloadClass> {
        if self.overloaded.contains(member) {
            Some(WorkloadClass::Overloaded)
        } else if self.underutilized.contains(member) {
            Some(WorkloadClass::Underutilized)
        } else if self.balanced.contains(member) {
            Some(WorkloadClass::Balanced)
        } else {
            None
        }
    }
}

/// Check that a score is finite and within [0, 1].
pub fn check_score(score: f64) -> Result<f64, ValidationError> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(ValidationError::InvalidScore(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_score_bounds() {
        assert_eq!(check_score(0.0), Ok(0.0));
        assert_eq!(check_score(1.0), Ok(1.0));
        assert!(check_score(1.01).is_err());
        assert!(check_score(-0.1).is_err());
        assert!(check_score(f64::NAN).is_err());
    }

    #[test]
    fn test_class_of() {
        let report = WorkloadReport {
            overloaded: vec![MemberId::new("a")],
            underutilized: vec![MemberId::new("b")],
            balanced: vec![MemberId::new("c")],
            ..Default::default()
        };
        assert_eq!(report.class_of(&MemberId::new("a")), Some(WorkloadClass::Overloaded));
        assert_eq!(report.class_of(&MemberId::new("b")), Some(WorkloadClass::Underutilized));
        assert_eq!(report.class_of(&MemberId::new("c")), Some(WorkloadClass::Balanced));
        assert_eq!(report.class_of(&MemberId::new("z")), None);
    }

    #[test]
    fn test_allocation_result_wire_names() {
        let result = AllocationResult {
            assigned_to: vec![MemberId::new("u2")],
            reasoning: "r".into(),
            suggested_timeline: "t".into(),
            confidence_score: 0.8,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["assignedTo"][0], "u2");
        assert_eq!(json["confidenceScore"], 0.8);
    }
}
