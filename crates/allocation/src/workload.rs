//! Team workload classification and redistribution.

use eventdesk_core::{
    MemberWorkload, ReassignmentSuggestion, Task, TeamMember, WorkloadClass, WorkloadReport,
};
use tracing::debug;

use crate::policy::AllocationPolicy;

/// Classifies members by active workload and proposes moves from overloaded
/// members to underutilized ones with matching skills.
///
/// Works on a snapshot; callers re-run it after tasks or the roster change.
#[derive(Debug, Clone, Default)]
pub struct WorkloadBalancer {
    policy: AllocationPolicy,
}

impl WorkloadBalancer {
    /// Create a balancer with the given policy.
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// Analyze the roster against all tasks.
    pub fn analyze(&self, roster: &[TeamMember], all_tasks: &[Task]) -> WorkloadReport {
        let members: Vec<MemberWorkload> = roster
            .iter()
            .map(|member| self.measure(member, all_tasks))
            .collect();

        let ids_in = |class: WorkloadClass| {
            members
                .iter()
                .filter(|w| w.class == class)
                .map(|w| w.member_id.clone())
                .collect::<Vec<_>>()
        };
        let overloaded = ids_in(WorkloadClass::Overloaded);
        let underutilized = ids_in(WorkloadClass::Underutilized);
        let balanced = ids_in(WorkloadClass::Balanced);

        let helpers: Vec<&TeamMember> = roster
            .iter()
            .filter(|m| underutilized.contains(&m.id))
            .collect();

        let suggestions: Vec<ReassignmentSuggestion> = roster
            .iter()
            .filter(|m| overloaded.contains(&m.id))
            .filter_map(|m| Self::suggest_move(m, &helpers, all_tasks))
            .collect();

        debug!(
            overloaded = overloaded.len(),
            underutilized = underutilized.len(),
            suggestions = suggestions.len(),
            "Workload analyzed"
        );

        let summary = format!(
            "The team currently has {} overloaded members and {} underutilized members. {}",
            overloaded.len(),
            underutilized.len(),
            if suggestions.is_empty() {
                "The current workload distribution is relatively balanced, but could be optimized further."
            } else {
                "Redistributing tasks as suggested would balance the workload."
            }
        );

        WorkloadReport {
            overloaded,
            underutilized,
            balanced,
            members,
            suggestions,
            summary,
        }
    }

    fn measure(&self, member: &TeamMember, all_tasks: &[Task]) -> MemberWorkload {
        let active: Vec<&Task> = active_tasks(member, all_tasks).collect();
        let hours: f64 = active
            .iter()
            .map(|t| t.hours_or(self.policy.default_task_hours))
            .sum();
        let workload_score = hours / self.policy.workload_hours_divisor;

        MemberWorkload {
            member_id: member.id.clone(),
            task_count: active.len(),
            workload_score,
            class: self.classify(workload_score, active.len()),
        }
    }

    /// Overloaded is checked first, then underutilized; anything else is balanced.
    pub fn classify(&self, workload_score: f64, task_count: usize) -> WorkloadClass {
        let p = &self.policy;
        if workload_score > p.overloaded_score || task_count > p.overloaded_task_count {
            WorkloadClass::Overloaded
        } else if workload_score < p.underutilized_score && task_count < p.underutilized_task_count {
            WorkloadClass::Underutilized
        } else {
            WorkloadClass::Balanced
        }
    }

    /// At most one move per overloaded member: their first active task, to the
    /// first underutilized member sharing a required skill.
    fn suggest_move(
        from: &TeamMember,
        helpers: &[&TeamMember],
        all_tasks: &[Task],
    ) -> Option<ReassignmentSuggestion> {
        let active: Vec<&Task> = active_tasks(from, all_tasks).collect();
        let task = *active.first()?;
        let to = helpers
            .iter()
            .find(|h| h.qualifies_for(&task.required_skills))?;

        Some(ReassignmentSuggestion {
            task_id: task.id.clone(),
            from_member: from.id.clone(),
            to_member: to.id.clone(),
            reasoning: format!(
                "{} is currently overloaded with {} tasks. {} has capacity and the necessary skills ({}) \
                 to take on the \"{}\" task.",
                from.name,
                active.len(),
                to.name,
                to.shared_skills(&task.required_skills).join(", "),
                task.title,
            ),
        })
    }
}

fn active_tasks<'a>(
    member: &'a TeamMember,
    all_tasks: &'a [Task],
) -> impl Iterator<Item = &'a Task> + 'a {
    all_tasks
        .iter()
        .filter(move |t| t.is_assigned_to(&member.id) && !t.is_completed())
}
