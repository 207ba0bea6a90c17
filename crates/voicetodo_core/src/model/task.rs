use crate::error::AppError;
use crate::model::DueDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "normal" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(AppError::invalid_input("priority must be low, medium or high")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields supplied by the caller when creating a task. Identity, status and
/// timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub task: String,
    #[serde(default)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub priority: Priority,
}

impl NewTask {
    pub fn new<T: Into<String>>(task: T) -> Self {
        Self {
            task: task.into(),
            due_date: None,
            priority: Priority::Medium,
        }
    }

    pub fn with_due_date(mut self, due_date: DueDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update merged into an existing task. `due_date: Some(None)` clears
/// the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub task: Option<String>,
    pub due_date: Option<Option<DueDate>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn completed() -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

impl Task {
    /// Merge `patch` into the task, stamping `updated_at` (and `completed_at`
    /// on completion) with `now`. Returns `false` and leaves the task as it was
    /// when the patch changes nothing, e.g. completing a completed task.
    pub fn apply(&mut self, patch: &TaskPatch, now: &str) -> Result<bool, AppError> {
        if self.status == TaskStatus::Completed && patch.status == Some(TaskStatus::Pending) {
            return Err(AppError::invalid_input("completed tasks cannot be reopened"));
        }

        let text = match patch.task.as_deref() {
            Some(text) if text.trim().is_empty() => {
                return Err(AppError::invalid_input("task text is required"));
            }
            Some(text) => Some(text.trim()),
            None => None,
        };

        let before = self.clone();
        if let Some(text) = text {
            self.task = text.to_string();
        }
        if let Some(due_date) = patch.due_date.as_ref() {
            self.due_date = due_date.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if patch.status == Some(TaskStatus::Completed) && self.status != TaskStatus::Completed {
            self.status = TaskStatus::Completed;
            self.completed_at = Some(now.to_string());
        }

        if *self == before {
            return Ok(false);
        }

        self.updated_at = Some(now.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task, TaskPatch, TaskStatus};
    use crate::model::DueDate;

    fn pending_task() -> Task {
        Task {
            id: "task-1".to_string(),
            task: "Call mom".to_string(),
            due_date: None,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            created_at: "2025-12-20T00:00:00Z".to_string(),
            updated_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut task = pending_task();
        task.due_date = Some(DueDate::NextWeek);
        task.priority = Priority::High;

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["dueDate"], "nextWeek");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["createdAt"], "2025-12-20T00:00:00Z");
        assert!(value.get("updatedAt").is_none());
        assert!(value.get("completedAt").is_none());
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let content = r#"{"id":"task-1","task":"demo","status":"pending","createdAt":"2025-12-20T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(content).unwrap();

        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.updated_at, None);
    }

    #[test]
    fn completing_sets_completed_at_and_updated_at() {
        let mut task = pending_task();
        task.apply(&TaskPatch::completed(), "2025-12-21T08:00:00Z")
            .unwrap();

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_at.as_deref(), Some("2025-12-21T08:00:00Z"));
        assert_eq!(task.updated_at.as_deref(), Some("2025-12-21T08:00:00Z"));
    }

    #[test]
    fn completed_task_cannot_be_reopened() {
        let mut task = pending_task();
        task.apply(&TaskPatch::completed(), "2025-12-21T08:00:00Z")
            .unwrap();

        let reopen = TaskPatch {
            status: Some(TaskStatus::Pending),
            ..TaskPatch::default()
        };
        assert_eq!(
            task.apply(&reopen, "2025-12-22T08:00:00Z").unwrap_err().code(),
            "invalid_input"
        );
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn completing_twice_changes_nothing() {
        let mut task = pending_task();
        assert!(
            task.apply(&TaskPatch::completed(), "2025-12-21T08:00:00Z")
                .unwrap()
        );
        let first = task.clone();

        let changed = task
            .apply(&TaskPatch::completed(), "2025-12-22T08:00:00Z")
            .unwrap();

        assert!(!changed);
        assert_eq!(task, first);
        assert_eq!(task.completed_at.as_deref(), Some("2025-12-21T08:00:00Z"));
    }

    #[test]
    fn patch_can_clear_due_date() {
        let mut task = pending_task();
        task.due_date = Some(DueDate::Tomorrow);

        let patch = TaskPatch {
            due_date: Some(None),
            priority: Some(Priority::Low),
            ..TaskPatch::default()
        };
        task.apply(&patch, "2025-12-21T08:00:00Z").unwrap();

        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn priority_parse_accepts_known_levels() {
        assert_eq!(Priority::parse(" High ").unwrap(), Priority::High);
        assert_eq!(Priority::parse("normal").unwrap(), Priority::Medium);
        assert_eq!(Priority::parse("whenever").unwrap_err().code(), "invalid_input");
    }
}
