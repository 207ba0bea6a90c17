use tabled::settings::Style;
use tabled::{Table, Tabled};
use voicetodo_core::model::{SyncEntry, SyncOperation, Task};

#[derive(Tabled)]
struct TaskRow {
    id: String,
    task: String,
    due: String,
    priority: &'static str,
    status: &'static str,
    created_at: String,
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "type")]
    operation: &'static str,
    task_id: String,
    task: String,
    queued_at: String,
}

fn operation_label(operation: SyncOperation) -> &'static str {
    match operation {
        SyncOperation::AddTask => "ADD_TASK",
        SyncOperation::UpdateTask => "UPDATE_TASK",
        SyncOperation::DeleteTask => "DELETE_TASK",
    }
}

pub fn task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks".to_string();
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: task.id.clone(),
        task: task.task.clone(),
        due: task
            .due_date
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string),
        priority: task.priority.as_str(),
        status: task.status.as_str(),
        created_at: task.created_at.clone(),
    });

    Table::new(rows).with(Style::sharp()).to_string()
}

pub fn queue_table(entries: &[SyncEntry]) -> String {
    if entries.is_empty() {
        return "Sync queue is empty".to_string();
    }

    let rows = entries.iter().map(|entry| QueueRow {
        operation: operation_label(entry.operation),
        task_id: entry.data.id.clone(),
        task: entry.data.task.clone(),
        queued_at: entry.queued_at.clone(),
    });

    Table::new(rows).with(Style::sharp()).to_string()
}
