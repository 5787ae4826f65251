//! Team member profiles.

use serde::{Deserialize, Serialize};

use crate::id::{MemberId, TaskId};

/// A committee member who can be assigned tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Unique identifier
    pub id: MemberId,

    /// Display name
    pub name: String,

    /// Role within the committee
    #[serde(default)]
    pub role: String,

    /// Committee the member belongs to
    #[serde(default)]
    pub committee: String,

    /// Skill tags
    #[serde(default)]
    pub skills: Vec<String>,

    /// Tasks currently on the member's plate
    #[serde(default)]
    pub current_tasks: Vec<TaskId>,

    /// Opaque day/slot labels
    #[serde(default)]
    pub availability: Vec<String>,

    /// Informational only; never used for ranking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_rating: Option<f64>,

    /// Area of expertise quoted in recommendation reasoning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl TeamMember {
    /// Create a member with no skills or tasks.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
            role: String::new(),
            committee: String::new(),
            skills: Vec::new(),
            current_tasks: Vec::new(),
            availability: Vec::new(),
            performance_rating: None,
            specialization: None,
        }
    }

    /// Set the skills.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Set the current task list.
    pub fn with_current_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current_tasks = tasks.into_iter().map(TaskId::new).collect();
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the specialization.
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    /// Number of tasks currently held.
    pub fn load(&self) -> usize {
        self.current_tasks.len()
    }

    /// Skills of this member that appear in `required`, in the member's order.
    pub fn shared_skills<'a>(&'a self, required: &[String]) -> Vec<&'a str> {
        self.skills
            .iter()
            .filter(|s| required.contains(s))
            .map(String::as_str)
            .collect()
    }

    /// Whether any skill appears in `required`.
    pub fn qualifies_for(&self, required: &[String]) -> bool {
        self.skills.iter().any(|s| required.contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let member: TeamMember =
            serde_json::from_str(r#"{"id":"user3","name":"Michael Brown","skills":["Illustration"]}"#)
                .unwrap();
        assert_eq!(member.id, MemberId::new("user3"));
        assert_eq!(member.load(), 0);
        assert!(member.specialization.is_none());
    }

    #[test]
    fn test_shared_skills_keeps_member_order() {
        let member = TeamMember::new("u1", "Jane").with_skills(["Budgeting", "Negotiation", "Excel"]);
        let required = vec!["Excel".to_string(), "Budgeting".to_string()];

        assert_eq!(member.shared_skills(&required), vec!["Budgeting", "Excel"]);
        assert!(member.qualifies_for(&required));
        assert!(!member.qualifies_for(&[]));
    }
}
