mod command;
mod due_date;
mod sync;
mod task;

pub use command::{Command, CommandType};
pub use due_date::{DueDate, month_from_name, weekday_from_name};
pub use sync::{SyncEntry, SyncOperation};
pub use task::{NewTask, Priority, Task, TaskPatch, TaskStatus};
