use crate::task_store::TaskStore;
use log::info;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Current network reachability, published to subscribers on every change.
#[derive(Debug)]
pub struct NetworkMonitor {
    sender: watch::Sender<bool>,
}

impl NetworkMonitor {
    pub fn new(connected: bool) -> Self {
        let (sender, _) = watch::channel(connected);
        Self { sender }
    }

    pub fn set_connected(&self, connected: bool) {
        self.sender.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Connectivity for NetworkMonitor {
    fn is_connected(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Flush the store's sync queue each time connectivity goes from offline to
/// online. The baseline is the state at the time of the call, so a change
/// made right after it still counts. The task ends once the monitor is dropped.
pub fn spawn_reconnect_flush(
    store: Arc<TaskStore>,
    mut receiver: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let mut was_connected = *receiver.borrow_and_update();
    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let connected = *receiver.borrow_and_update();
            if connected && !was_connected {
                info!("connectivity regained, flushing sync queue");
                store.attempt_flush().await;
            }
            was_connected = connected;
        }
    })
}
