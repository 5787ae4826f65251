//! Ranks open tasks for one team member.

use eventdesk_core::{RecommendationResult, RecommendedTask, Task, TeamMember};
use tracing::debug;

use crate::policy::AllocationPolicy;

/// Suggests which open tasks a member should pick up.
///
/// Candidates are trusted as given: filtering out completed or already
/// assigned tasks is the caller's job (see `Board::open_tasks`).
#[derive(Debug, Clone, Default)]
pub struct PersonalTaskMatcher {
    policy: AllocationPolicy,
}

impl PersonalTaskMatcher {
    /// Create a matcher with the given policy.
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// Rank skill-matching candidates by priority, then deadline.
    pub fn recommend(&self, member: &TeamMember, candidates: &[Task]) -> RecommendationResult {
        let Some(first) = candidates.first() else {
            return RecommendationResult::default();
        };

        let mut matching: Vec<&Task> = candidates
            .iter()
            .filter(|t| t.requires_any(&member.skills))
            .collect();

        if matching.is_empty() {
            debug!(member = %member.id, "No skill match, recommending first candidate");
            return RecommendationResult {
                recommended_tasks: vec![RecommendedTask {
                    task_id: first.id.clone(),
                    reasoning: format!(
                        "Although this task doesn't match your skills, it's a {} priority item that needs attention.",
                        first.priority.as_str().to_lowercase()
                    ),
                    fit_score: self.policy.mismatch_fit_score.clamp(0.0, 1.0),
                }],
            };
        }

        matching.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.deadline.cmp(&b.deadline))
        });

        let specialization = member.specialization.as_deref().unwrap_or("your field");
        let recommended_tasks: Vec<RecommendedTask> = matching
            .into_iter()
            .take(self.policy.max_recommendations)
            .enumerate()
            .map(|(rank, task)| RecommendedTask {
                task_id: task.id.clone(),
                reasoning: format!(
                    "This task requires {} which matches your skill set. {} priority tasks should be addressed \
                     promptly, and your experience in {} makes you well-suited for this work.",
                    task.shared_skills(&member.skills).join(", "),
                    task.priority,
                    specialization,
                ),
                fit_score: self.policy.fit_score(rank),
            })
            .collect();

        debug!(member = %member.id, count = recommended_tasks.len(), "Ranked personal tasks");

        RecommendationResult { recommended_tasks }
    }
}
