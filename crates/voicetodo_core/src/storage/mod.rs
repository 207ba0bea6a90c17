//! Durable key-value storage and the JSON documents kept in it.

use crate::error::AppError;

mod file;
pub mod json_store;
mod memory;

pub use file::{FileStorage, store_dir};
pub use memory::MemoryStorage;

pub const TASKS_KEY: &str = "voice_tasks";
pub const SYNC_QUEUE_KEY: &str = "sync_queue";

/// Whole-document storage keyed by name. Implementations must make a
/// successful `write` visible to every later `read` of the same key.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;
}
