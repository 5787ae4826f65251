//! Task model - a unit of event-planning work owned by a committee.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{MemberId, TaskId};

/// A task as supplied by the dashboard's data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Skill tags needed to do the work
    #[serde(default)]
    pub required_skills: Vec<String>,

    /// Urgency
    pub priority: Priority,

    /// Due date
    #[serde(with = "deadline_format")]
    pub deadline: NaiveDate,

    /// Effort estimate; absent when the creator left it blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Hours>,

    /// Current status
    pub status: TaskStatus,

    /// Assignees, in assignment order
    #[serde(default)]
    pub assigned_to: Vec<MemberId>,

    /// Tasks that must be completed before this one may start
    #[serde(default)]
    pub dependencies: Vec<TaskId>,

    /// Owning committee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee: Option<String>,

    /// Event this task belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl Task {
    /// Create an unassigned, not-started task with no skills or estimate.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        priority: Priority,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: TaskId::new(id),
            title: title.into(),
            description: String::new(),
            required_skills: Vec::new(),
            priority,
            deadline,
            estimated_hours: None,
            status: TaskStatus::NotStarted,
            assigned_to: Vec::new(),
            dependencies: Vec::new(),
            committee: None,
            event: None,
        }
    }

    /// Set the required skills.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Set the effort estimate.
    pub fn with_hours(mut self, hours: Hours) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the assignees.
    pub fn with_assignees<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_to = members.into_iter().map(|m| MemberId::new(m)).collect();
        self
    }

    /// Set the dependencies.
    pub fn with_dependencies<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = tasks.into_iter().map(|t| TaskId::new(t)).collect();
        self
    }

    /// Estimated hours, or `default` when the estimate is missing.
    pub fn hours_or(&self, default: f64) -> f64 {
        self.estimated_hours.map_or(default, Hours::get)
    }

    /// Whether the task is done.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether nobody is assigned.
    pub fn is_unassigned(&self) -> bool {
        self.assigned_to.is_empty()
    }

    /// Open for assignment: not completed and nobody assigned yet.
    pub fn is_open(&self) -> bool {
        !self.is_completed() && self.is_unassigned()
    }

    /// Whether `member` is among the assignees.
    pub fn is_assigned_to(&self, member: &MemberId) -> bool {
        self.assigned_to.contains(member)
    }

    /// Required skills that appear in `skills`, in this task's order.
    pub fn shared_skills<'a>(&'a self, skills: &[String]) -> Vec<&'a str> {
        self.required_skills
            .iter()
            .filter(|s| skills.contains(s))
            .map(String::as_str)
            .collect()
    }

    /// Whether any required skill appears in `skills`.
    pub fn requires_any(&self, skills: &[String]) -> bool {
        self.required_skills.iter().any(|s| skills.contains(s))
    }
}

/// Task urgency. Ordering puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Needs attention first
    High,
    /// Normal
    Medium,
    /// Can wait
    Low,
}

impl Priority {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task status as shown on the kanban board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not picked up yet
    #[serde(rename = "Not Started", alias = "NotStarted")]
    NotStarted,
    /// Assigned but work has not begun
    Assigned,
    /// Being worked on
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    /// Done
    Completed,
}

impl TaskStatus {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::Assigned => "Assigned",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "notstarted" => Ok(TaskStatus::NotStarted),
            "assigned" => Ok(TaskStatus::Assigned),
            "inprogress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status: {s}")),
        }
    }
}

/// A positive, finite effort estimate in hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Hours(f64);

impl Hours {
    /// Validate an estimate.
    pub fn new(hours: f64) -> Result<Self, ValidationError> {
        if hours.is_finite() && hours > 0.0 {
            Ok(Self(hours))
        } else {
            Err(ValidationError::InvalidHours(hours))
        }
    }

    /// Raw value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Hours {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hours> for f64 {
    fn from(hours: Hours) -> Self {
        hours.0
    }
}

impl std::fmt::Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Deadlines are written as ISO dates; the dashboard's long form
/// ("June 5, 2023") is accepted on input.
mod deadline_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO: &str = "%Y-%m-%d";
    const LONG: &str = "%B %d, %Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(ISO))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, ISO)
            .or_else(|_| NaiveDate::parse_from_str(raw, LONG))
            .map_err(|e| serde::de::Error::custom(format!("invalid deadline '{raw}': {e}")))
    }
}
