pub mod capture;
pub mod clock;
pub mod command_parser;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod model;
pub mod remote;
pub mod storage;
pub mod task_store;
pub mod voice;

use crate::config::Config;
use crate::connectivity::NetworkMonitor;
use crate::error::AppError;
use crate::remote::{HttpRemote, NullRemote, RemoteSync};
use crate::storage::{FileStorage, store_dir};
use crate::task_store::TaskStore;
use std::sync::Arc;

/// A store wired to file storage, the configured remote and a network
/// monitor seeded from the `offline` setting.
pub fn open_store(config: &Config) -> Result<(Arc<TaskStore>, Arc<NetworkMonitor>), AppError> {
    let dir = match config.store_dir.as_ref() {
        Some(dir) => dir.clone(),
        None => store_dir()?,
    };

    let remote: Arc<dyn RemoteSync> = match config.remote_url.as_deref() {
        Some(url) => Arc::new(HttpRemote::new(url)?),
        None => Arc::new(NullRemote),
    };
    let monitor = Arc::new(NetworkMonitor::new(!config.offline));

    let store = TaskStore::new(Arc::new(FileStorage::new(dir)), remote, monitor.clone())
        .with_flush_timeout(config.flush_timeout());

    Ok((Arc::new(store), monitor))
}
