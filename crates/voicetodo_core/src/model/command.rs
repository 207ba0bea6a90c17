use crate::model::{DueDate, NewTask, Priority};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Add,
    Complete,
    Delete,
    List,
}

impl CommandType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Complete => "complete",
            Self::Delete => "delete",
            Self::List => "list",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reading of one transcript. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub command_type: CommandType,
    pub task: String,
    pub due_date: Option<DueDate>,
    pub priority: Priority,
    pub timestamp: String,
}

impl From<&Command> for NewTask {
    fn from(command: &Command) -> Self {
        NewTask {
            task: command.task.clone(),
            due_date: command.due_date.clone(),
            priority: command.priority,
        }
    }
}
