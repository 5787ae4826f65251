//! Prompts sent to the generative model.
//!
//! Each prompt lists the records the model needs and ends with the exact
//! JSON shape the response parser in [`crate::response`] accepts.

use std::fmt::Write;

use eventdesk_core::{Task, TeamMember};

fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn hours(task: &Task) -> String {
    task.estimated_hours
        .map_or_else(|| "Not estimated".to_string(), |h| h.to_string())
}

fn write_task(out: &mut String, task: &Task) {
    let _ = write!(
        out,
        "\n- Task ID: {}\n  Title: {}\n  Description: {}\n  Required Skills: {}\n  Priority: {}\n  Deadline: {}\n  Estimated Hours: {}\n",
        task.id,
        task.title,
        task.description,
        list_or(&task.required_skills, "None"),
        task.priority,
        task.deadline,
        hours(task),
    );
}

fn write_member(out: &mut String, member: &TeamMember) {
    let _ = write!(
        out,
        "\n- ID: {}\n  Name: {}\n  Role: {}\n  Skills: {}\n  Current Tasks: {}\n  Availability: {}\n",
        member.id,
        member.name,
        member.role,
        list_or(&member.skills, "None"),
        member.load(),
        list_or(&member.availability, "Not specified"),
    );
}

/// Ask for the best assignee(s) of one task.
pub fn assignment_prompt(task: &Task, roster: &[TeamMember]) -> String {
    let mut out = String::from(
        "Task Assignment Request:\nAssign the following task to the most appropriate team member(s).\n\nTask Details:",
    );
    write_task(&mut out, task);
    out.push_str("\nTeam Members:");
    for member in roster {
        write_member(&mut out, member);
    }
    out.push_str(
        r#"
Analyze the task requirements and the team members' profiles to determine the best assignment.
Respond with a single JSON object and nothing else:
{
  "assignedTo": ["<member id>"],
  "reasoning": "<why these members were selected>",
  "suggestedTimeline": "<how to approach the task timeline>",
  "confidenceScore": <number between 0 and 1>
}
Use one member id, or two when the task needs collaboration. Only use ids listed above.
"#,
    );
    out
}

/// Ask for the tasks best suited to one member.
pub fn recommendation_prompt(member: &TeamMember, candidates: &[Task], limit: usize) -> String {
    let mut out = String::from(
        "Task Recommendation Request:\nRecommend tasks for a team member based on their skills.\n\nTeam Member:",
    );
    write_member(&mut out, member);
    let _ = writeln!(
        out,
        "  Specialization: {}",
        member.specialization.as_deref().unwrap_or("Not specified")
    );
    out.push_str("\nAvailable Tasks:");
    for task in candidates {
        write_task(&mut out, task);
    }
    let _ = write!(
        out,
        r#"
Recommend at most {limit} of the available tasks, best fit first.
Respond with a single JSON object and nothing else:
{{
  "recommendedTasks": [
    {{ "taskId": "<task id>", "reasoning": "<why this task fits>", "fitScore": <number between 0 and 1> }}
  ]
}}
Only use task ids listed above.
"#
    );
    out
}

/// Ask for a workload analysis of the whole team.
pub fn workload_prompt(roster: &[TeamMember], all_tasks: &[Task], default_hours: f64) -> String {
    let mut out = String::from(
        "Team Workload Analysis Request:\nAnalyze the workload distribution across team members and suggest task redistributions.\n\nTeam Members and Their Active Tasks:",
    );
    for member in roster {
        let active: Vec<&Task> = all_tasks
            .iter()
            .filter(|t| t.is_assigned_to(&member.id) && !t.is_completed())
            .collect();
        let total: f64 = active.iter().map(|t| t.hours_or(default_hours)).sum();

        write_member(&mut out, member);
        let _ = writeln!(out, "  Active Tasks: {}\n  Total Estimated Hours: {}", active.len(), total);
        let details: Vec<String> = active
            .iter()
            .map(|t| format!("{} ({}, {} hours)", t.title, t.status, hours(t)))
            .collect();
        let _ = writeln!(out, "  Task Details: {}", list_or(&details, "None"));
    }

    out.push_str("\nAll Tasks:");
    for task in all_tasks {
        write_task(&mut out, task);
        let assignees: Vec<String> = task.assigned_to.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            out,
            "  Status: {}\n  Assigned To: {}",
            task.status,
            list_or(&assignees, "Unassigned")
        );
    }

    out.push_str(
        r#"
Respond with a single JSON object and nothing else:
{
  "workloadAnalysis": {
    "overloadedMembers": ["<member id>"],
    "underutilizedMembers": ["<member id>"],
    "balancedMembers": ["<member id>"]
  },
  "redistributionSuggestions": [
    { "taskId": "<task id>", "currentAssignee": "<member id>", "suggestedAssignee": "<member id>", "reasoning": "<why>" }
  ],
  "generalInsights": "<overall analysis>"
}
Every member id must appear in exactly one of the three lists.
"#,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use eventdesk_core::{Hours, Priority, TaskStatus};

    fn task() -> Task {
        Task::new("task1", "Design event poster", Priority::High, NaiveDate::from_ymd_opt(2023, 6, 5).unwrap())
            .with_skills(["Graphic Design", "Creativity"])
            .with_hours(Hours::new(6.0).unwrap())
            .with_assignees(["user3"])
            .with_status(TaskStatus::InProgress)
    }

    fn member() -> TeamMember {
        TeamMember::new("user3", "Michael Brown")
            .with_role("Designer")
            .with_skills(["Graphic Design"])
            .with_specialization("Visual Design")
    }

    #[test]
    fn test_assignment_prompt_lists_task_and_members() {
        let prompt = assignment_prompt(&task(), &[member()]);
        assert!(prompt.contains("Title: Design event poster"));
        assert!(prompt.contains("Required Skills: Graphic Design, Creativity"));
        assert!(prompt.contains("Estimated Hours: 6"));
        assert!(prompt.contains("Name: Michael Brown"));
        assert!(prompt.contains("Availability: Not specified"));
        assert!(prompt.contains("\"assignedTo\""));
    }

    #[test]
    fn test_recommendation_prompt_includes_specialization_and_limit() {
        let prompt = recommendation_prompt(&member(), &[task()], 3);
        assert!(prompt.contains("Specialization: Visual Design"));
        assert!(prompt.contains("at most 3"));
        assert!(prompt.contains("\"recommendedTasks\""));
    }

    #[test]
    fn test_workload_prompt_totals_active_hours() {
        let prompt = workload_prompt(&[member()], &[task()], 5.0);
        assert!(prompt.contains("Active Tasks: 1"));
        assert!(prompt.contains("Total Estimated Hours: 6"));
        assert!(prompt.contains("Design event poster (In Progress, 6 hours)"));
        assert!(prompt.contains("Assigned To: user3"));
    }
}
