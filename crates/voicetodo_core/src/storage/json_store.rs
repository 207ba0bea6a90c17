use crate::error::AppError;
use crate::model::{SyncEntry, Task};
use crate::storage::{SYNC_QUEUE_KEY, Storage, TASKS_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredQueue {
    schema_version: u32,
    entries: Vec<SyncEntry>,
}

pub fn load_tasks(storage: &dyn Storage) -> Result<Vec<Task>, AppError> {
    let Some(content) = storage.read(TASKS_KEY)? else {
        return Ok(Vec::new());
    };

    let stored: StoredTasks =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;
    check_schema_version(stored.schema_version)?;

    let mut seen = HashSet::new();
    for task in &stored.tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(AppError::invalid_data(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }

    Ok(stored.tasks)
}

pub fn save_tasks(storage: &dyn Storage, tasks: &[Task]) -> Result<(), AppError> {
    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    storage.write(TASKS_KEY, &content)
}

pub fn load_queue(storage: &dyn Storage) -> Result<Vec<SyncEntry>, AppError> {
    let Some(content) = storage.read(SYNC_QUEUE_KEY)? else {
        return Ok(Vec::new());
    };

    let stored: StoredQueue =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;
    check_schema_version(stored.schema_version)?;

    Ok(stored.entries)
}

pub fn save_queue(storage: &dyn Storage, entries: &[SyncEntry]) -> Result<(), AppError> {
    let stored = StoredQueue {
        schema_version: SCHEMA_VERSION,
        entries: entries.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    storage.write(SYNC_QUEUE_KEY, &content)
}

fn check_schema_version(version: u32) -> Result<(), AppError> {
    if !(1..=SCHEMA_VERSION).contains(&version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }
    Ok(())
}
