use crate::model::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncOperation {
    AddTask,
    UpdateTask,
    DeleteTask,
}

/// A local mutation waiting to be pushed to the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEntry {
    #[serde(rename = "type")]
    pub operation: SyncOperation,
    pub data: Task,
    pub queued_at: String,
}
