//! Offline-first task repository.
//!
//! Every mutation rewrites the whole task document, appends one entry to the
//! sync queue and then starts a background flush of that queue. The task
//! document and the queue document each have their own async mutex, always
//! taken in the order tasks → queue and only around local reads and writes.
//! Flushes are serialized by a separate lock held across the remote call, so
//! two flushes never submit the same batch while mutations keep appending.

use crate::clock;
use crate::connectivity::Connectivity;
use crate::error::AppError;
use crate::model::{NewTask, SyncEntry, SyncOperation, Task, TaskPatch, TaskStatus};
use crate::remote::RemoteSync;
use crate::storage::{Storage, json_store};
use log::{debug, info, warn};
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;

pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

const MATCH_STOPWORDS: &[&str] = &["the", "a", "an", "my", "task", "to", "of", "for", "that"];

pub struct TaskStore {
    storage: Arc<dyn Storage>,
    tasks_lock: Mutex<()>,
    sync: Arc<SyncQueue>,
}

/// The durable queue of pending mutations and everything needed to push it
/// to the remote. Shared with detached flush tasks.
struct SyncQueue {
    storage: Arc<dyn Storage>,
    remote: Arc<dyn RemoteSync>,
    connectivity: Arc<dyn Connectivity>,
    flush_timeout: Duration,
    queue_lock: Mutex<()>,
    flush_lock: Mutex<()>,
}

impl TaskStore {
    pub fn new(
        storage: Arc<dyn Storage>,
        remote: Arc<dyn RemoteSync>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        let sync = SyncQueue::new(
            storage.clone(),
            remote,
            connectivity,
            DEFAULT_FLUSH_TIMEOUT,
        );
        Self {
            storage,
            tasks_lock: Mutex::new(()),
            sync: Arc::new(sync),
        }
    }

    pub fn with_flush_timeout(mut self, flush_timeout: Duration) -> Self {
        self.sync = Arc::new(SyncQueue::new(
            self.sync.storage.clone(),
            self.sync.remote.clone(),
            self.sync.connectivity.clone(),
            flush_timeout,
        ));
        self
    }

    /// All tasks in display order: pending before completed, then by
    /// resolvable due date, then newest first.
    pub async fn list(&self) -> Result<Vec<Task>, AppError> {
        let _guard = self.tasks_lock.lock().await;
        let mut tasks = json_store::load_tasks(self.storage.as_ref())?;
        sort_for_display(&mut tasks, clock::today_local());
        Ok(tasks)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Task>, AppError> {
        let trimmed_id = id.trim();
        let _guard = self.tasks_lock.lock().await;
        let tasks = json_store::load_tasks(self.storage.as_ref())?;
        Ok(tasks.into_iter().find(|task| task.id == trimmed_id))
    }

    pub async fn add(&self, new_task: NewTask) -> Result<Task, AppError> {
        let trimmed = new_task.task.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("task text is required"));
        }

        let task = {
            let _guard = self.tasks_lock.lock().await;
            let mut tasks = json_store::load_tasks(self.storage.as_ref())?;

            let task = Task {
                id: next_task_id(&tasks),
                task: trimmed.to_string(),
                due_date: new_task.due_date,
                priority: new_task.priority,
                status: TaskStatus::Pending,
                created_at: clock::now_rfc3339()?,
                updated_at: None,
                completed_at: None,
            };

            tasks.push(task.clone());
            json_store::save_tasks(self.storage.as_ref(), &tasks)?;
            self.sync.enqueue(SyncOperation::AddTask, &task).await?;
            task
        };

        self.schedule_flush();
        Ok(task)
    }

    /// Merge `patch` into the task with `id`. Returns `Ok(None)` when no such
    /// task exists. A patch that changes nothing returns the task without
    /// writing or queueing anything.
    pub async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Option<Task>, AppError> {
        let trimmed_id = id.trim();
        if trimmed_id.is_empty() {
            return Err(AppError::invalid_input("id is required"));
        }

        let updated = {
            let _guard = self.tasks_lock.lock().await;
            let mut tasks = json_store::load_tasks(self.storage.as_ref())?;

            let Some(task) = tasks.iter_mut().find(|task| task.id == trimmed_id) else {
                warn!("task not found: {trimmed_id}");
                return Ok(None);
            };

            let now = clock::now_rfc3339()?;
            if !task.apply(patch, &now)? {
                debug!("update of {trimmed_id} changed nothing");
                return Ok(Some(task.clone()));
            }
            let updated = task.clone();

            json_store::save_tasks(self.storage.as_ref(), &tasks)?;
            self.sync.enqueue(SyncOperation::UpdateTask, &updated).await?;
            updated
        };

        self.schedule_flush();
        Ok(Some(updated))
    }

    pub async fn complete(&self, id: &str) -> Result<Option<Task>, AppError> {
        self.update(id, &TaskPatch::completed()).await
    }

    /// Remove the task with `id`. Unknown ids are a no-op; the result is
    /// `true` whenever the collection was written.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let trimmed_id = id.trim();
        if trimmed_id.is_empty() {
            return Err(AppError::invalid_input("id is required"));
        }

        let removed = {
            let _guard = self.tasks_lock.lock().await;
            let mut tasks = json_store::load_tasks(self.storage.as_ref())?;

            let removed = tasks
                .iter()
                .position(|task| task.id == trimmed_id)
                .map(|index| tasks.remove(index));

            json_store::save_tasks(self.storage.as_ref(), &tasks)?;
            if let Some(task) = removed.as_ref() {
                self.sync.enqueue(SyncOperation::DeleteTask, task).await?;
            }
            removed
        };

        match removed {
            Some(_) => self.schedule_flush(),
            None => debug!("delete of unknown task {trimmed_id} left the collection unchanged"),
        }

        Ok(true)
    }

    /// Best task for a spoken phrase: an exact (case-insensitive) text match,
    /// otherwise the task sharing the most meaningful words with the phrase.
    /// Ties go to whichever comes first in display order.
    pub async fn find_by_phrase(&self, phrase: &str) -> Result<Option<Task>, AppError> {
        let needle = phrase.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let tasks = self.list().await?;
        if let Some(exact) = tasks.iter().find(|task| task.task.to_lowercase() == needle) {
            return Ok(Some(exact.clone()));
        }

        let wanted = match_words(&needle);
        let mut best: Option<(usize, &Task)> = None;
        for task in &tasks {
            let lowered = task.task.to_lowercase();
            let have = match_words(&lowered);
            let score = wanted.iter().filter(|word| have.contains(*word)).count();
            if score > 0 && best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, task));
            }
        }

        Ok(best.map(|(_, task)| task.clone()))
    }

    /// Snapshot of mutations not yet accepted by the remote.
    pub async fn pending_sync(&self) -> Result<Vec<SyncEntry>, AppError> {
        self.sync.pending().await
    }

    /// Submit the whole sync queue in one batch and wait for the outcome.
    /// Returns `false` when offline or when the remote fails or times out;
    /// the queue is then left as is.
    pub async fn attempt_flush(&self) -> bool {
        self.sync.flush().await
    }

    /// Start a flush without waiting for it. Must run inside a tokio runtime.
    fn schedule_flush(&self) {
        let sync = Arc::clone(&self.sync);
        tokio::spawn(async move {
            sync.flush().await;
        });
    }
}

impl SyncQueue {
    fn new(
        storage: Arc<dyn Storage>,
        remote: Arc<dyn RemoteSync>,
        connectivity: Arc<dyn Connectivity>,
        flush_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            remote,
            connectivity,
            flush_timeout,
            queue_lock: Mutex::new(()),
            flush_lock: Mutex::new(()),
        }
    }

    async fn pending(&self) -> Result<Vec<SyncEntry>, AppError> {
        let _guard = self.queue_lock.lock().await;
        json_store::load_queue(self.storage.as_ref())
    }

    async fn enqueue(&self, operation: SyncOperation, task: &Task) -> Result<(), AppError> {
        let _guard = self.queue_lock.lock().await;
        let mut queue = json_store::load_queue(self.storage.as_ref())?;
        queue.push(SyncEntry {
            operation,
            data: task.clone(),
            queued_at: clock::now_rfc3339()?,
        });
        json_store::save_queue(self.storage.as_ref(), &queue)?;
        debug!(
            "queued {:?} for {} ({} pending)",
            operation,
            task.id,
            queue.len()
        );
        Ok(())
    }

    async fn flush(&self) -> bool {
        let _flushing = self.flush_lock.lock().await;

        if !self.connectivity.is_connected() {
            info!("device is offline, sync postponed");
            return false;
        }

        let batch = match self.pending().await {
            Ok(batch) => batch,
            Err(err) => {
                warn!("failed to read sync queue: {err}");
                return false;
            }
        };

        if batch.is_empty() {
            return true;
        }

        match tokio::time::timeout(self.flush_timeout, self.remote.submit(&batch)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!("sync failed, keeping {} queued operations: {err}", batch.len());
                return false;
            }
            Err(_) => {
                warn!(
                    "sync timed out after {:?}, keeping {} queued operations",
                    self.flush_timeout,
                    batch.len()
                );
                return false;
            }
        }

        // Only flushes remove entries and they hold `flush_lock`, so the
        // submitted batch is still the head of the queue.
        let _guard = self.queue_lock.lock().await;
        let remaining = json_store::load_queue(self.storage.as_ref()).and_then(|queue| {
            let rest = queue.get(batch.len()..).unwrap_or_default().to_vec();
            json_store::save_queue(self.storage.as_ref(), &rest).map(|()| rest.len())
        });

        match remaining {
            Ok(remaining) => {
                info!(
                    "flushed {} queued operations ({remaining} queued meanwhile)",
                    batch.len()
                );
                true
            }
            Err(err) => {
                warn!("remote accepted batch but trimming the queue failed: {err}");
                false
            }
        }
    }
}

fn next_task_id(tasks: &[Task]) -> String {
    let mut nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    loop {
        let id = format!("task-{nanos}");
        if !tasks.iter().any(|task| task.id == id) {
            return id;
        }
        nanos += 1;
    }
}

fn match_words(text: &str) -> Vec<&str> {
    text.split(|ch: char| !ch.is_alphanumeric() && ch != '\'')
        .filter(|word| !word.is_empty() && !MATCH_STOPWORDS.contains(word))
        .collect()
}

pub fn sort_for_display(tasks: &mut [Task], today: Date) {
    tasks.sort_by_cached_key(|task| {
        let completed = task.status != TaskStatus::Pending;
        let due = task
            .due_date
            .as_ref()
            .and_then(|due_date| due_date.days_from(today));
        let created = OffsetDateTime::parse(&task.created_at, &Rfc3339).ok();
        (completed, due.is_none(), due, Reverse(created))
    });
}
