//! The caller-owned snapshot of tasks and team members.
//!
//! The allocation heuristics never mutate anything; applying an assignment
//! and pre-filtering candidate tasks happen here, on the caller's side.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{MemberId, TaskId};
use crate::member::TeamMember;
use crate::task::{Task, TaskStatus};

/// Tasks and roster for one organisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Roster
    #[serde(default)]
    pub members: Vec<TeamMember>,

    /// All tasks, completed ones included
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Board {
    /// Create a board.
    pub fn new(members: Vec<TeamMember>, tasks: Vec<Task>) -> Self {
        Self { members, tasks }
    }

    /// Reject duplicate ids.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(&member.id) {
                return Err(ValidationError::DuplicateMember(member.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(&task.id) {
                return Err(ValidationError::DuplicateTask(task.id.clone()));
            }
        }

        Ok(())
    }

    /// Find a member.
    pub fn member(&self, id: &MemberId) -> Option<&TeamMember> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Find a task.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Tasks with the given status.
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Candidates for personal recommendations: not completed and unassigned.
    pub fn open_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.is_open()).cloned().collect()
    }

    /// Whether every dependency of the task exists and is completed.
    ///
    /// Unknown tasks return `false`; a dependency missing from the board blocks.
    pub fn can_start(&self, id: &TaskId) -> bool {
        let Some(task) = self.task(id) else {
            return false;
        };

        task.dependencies
            .iter()
            .all(|dep| self.task(dep).is_some_and(Task::is_completed))
    }

    /// Record an assignment: set the assignees, move the task to in-progress,
    /// and move the task from the previous assignees' current tasks to the
    /// new ones'. Completed tasks are rejected.
    pub fn apply_assignment(
        &mut self,
        task_id: &TaskId,
        assignees: &[MemberId],
    ) -> Result<(), ValidationError> {
        if let Some(unknown) = assignees.iter().find(|id| self.member(id).is_none()) {
            return Err(ValidationError::UnknownMember(unknown.clone()));
        }

        let task = self
            .tasks
            .iter_mut()
            .find(|t| &t.id == task_id)
            .ok_or_else(|| ValidationError::UnknownTask(task_id.clone()))?;
        if task.is_completed() {
            return Err(ValidationError::TaskCompleted(task_id.clone()));
        }
        let previous = std::mem::replace(&mut task.assigned_to, assignees.to_vec());
        task.status = TaskStatus::InProgress;

        for member in self.members.iter_mut() {
            if assignees.contains(&member.id) {
                if !member.current_tasks.contains(task_id) {
                    member.current_tasks.push(task_id.clone());
                }
            } else if previous.contains(&member.id) {
                member.current_tasks.retain(|id| id != task_id);
            }
        }

        Ok(())
    }
}
