//! Picks assignees for a single task.

use eventdesk_core::{AllocationResult, Task, TeamMember};
use tracing::debug;

use crate::error::{AllocationError, Result};
use crate::policy::AllocationPolicy;

/// Recommends who should take a task: skill match first, then the lightest
/// current load.
#[derive(Debug, Clone, Default)]
pub struct AssignmentRecommender {
    policy: AllocationPolicy,
}

impl AssignmentRecommender {
    /// Create a recommender with the given policy.
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// Recommend one assignee, or two when the task needs collaboration.
    ///
    /// Fails only when `roster` is empty. When nobody shares a required
    /// skill the whole roster is ranked instead.
    pub fn recommend(&self, task: &Task, roster: &[TeamMember]) -> Result<AllocationResult> {
        if roster.is_empty() {
            return Err(AllocationError::InvalidInput(format!(
                "no team members available to assign task '{}'",
                task.id
            )));
        }

        let qualifying: Vec<&TeamMember> = roster
            .iter()
            .filter(|m| m.qualifies_for(&task.required_skills))
            .collect();
        let skill_match = !qualifying.is_empty();

        let mut ranked = if skill_match {
            qualifying
        } else {
            roster.iter().collect()
        };
        // sort_by_key is stable: equal loads keep roster order
        ranked.sort_by_key(|m| m.load());

        let hours = task.hours_or(self.policy.default_task_hours);
        let primary = ranked[0];
        let partner = (skill_match && hours > self.policy.collaboration_hours_threshold)
            .then(|| ranked.get(1).copied())
            .flatten();

        let mut assigned_to = vec![primary.id.clone()];
        if let Some(partner) = partner {
            assigned_to.push(partner.id.clone());
        }

        debug!(
            task = %task.id,
            candidates = ranked.len(),
            skill_match,
            assignees = assigned_to.len(),
            "Ranked assignees"
        );

        let mut reasoning = if skill_match {
            format!(
                "{} is the best match for this task because they have {} skills which are required for this task. \
                 They currently have {} tasks assigned, which means they have capacity to take on this work.",
                primary.name,
                primary.shared_skills(&task.required_skills).join(", "),
                primary.load(),
            )
        } else {
            format!(
                "Nobody on the team lists the required skills ({}). {} has the lightest workload with {} tasks assigned, \
                 so they are the most available person to take this on.",
                if task.required_skills.is_empty() {
                    "none specified".to_string()
                } else {
                    task.required_skills.join(", ")
                },
                primary.name,
                primary.load(),
            )
        };
        if let Some(partner) = partner {
            reasoning.push_str(&format!(
                " Since this is a complex task requiring {} hours, {} has also been assigned to collaborate.",
                hours, partner.name
            ));
        }

        Ok(AllocationResult {
            suggested_timeline: self.timeline(task, hours, assigned_to.len()),
            assigned_to,
            reasoning,
            confidence_score: self.policy.fallback_confidence.clamp(0.0, 1.0),
        })
    }

    fn timeline(&self, task: &Task, hours: f64, assignees: usize) -> String {
        let per_person = (hours / assignees as f64).ceil();
        let days = ((hours / self.policy.hours_per_timeline_day).ceil() as u32)
            .clamp(1, self.policy.max_timeline_days.max(1));

        format!(
            "Given the task complexity and deadline of {}, start this task immediately and allocate \
             {} hours per person over the next {} {}.",
            task.deadline,
            per_person,
            days,
            if days == 1 { "day" } else { "days" },
        )
    }
}
