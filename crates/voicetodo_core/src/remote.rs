use crate::error::AppError;
use crate::model::SyncEntry;
use async_trait::async_trait;
use log::info;
use serde::Serialize;

/// Remote backend receiving queued mutations. A batch is accepted or
/// rejected as a whole.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    async fn submit(&self, entries: &[SyncEntry]) -> Result<(), AppError>;
}

/// Accepts every batch without sending it anywhere. Used when no remote
/// endpoint is configured, so the queue still drains.
pub struct NullRemote;

#[async_trait]
impl RemoteSync for NullRemote {
    async fn submit(&self, entries: &[SyncEntry]) -> Result<(), AppError> {
        info!(
            "no remote configured, dropping {} queued operations",
            entries.len()
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct SyncBatch<'a> {
    operations: &'a [SyncEntry],
}

/// POSTs each batch as `{"operations": [...]}` to a fixed endpoint.
pub struct HttpRemote {
    client: reqwest::Client,
    url: String,
}

impl HttpRemote {
    pub fn new(url: &str) -> Result<Self, AppError> {
        let trimmed = url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(AppError::invalid_input(
                "remote_url must start with http:// or https://",
            ));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| AppError::sync(err.to_string()))?;

        Ok(Self {
            client,
            url: trimmed.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteSync for HttpRemote {
    async fn submit(&self, entries: &[SyncEntry]) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SyncBatch {
                operations: entries,
            })
            .send()
            .await
            .map_err(|err| AppError::sync(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::sync(format!("remote rejected batch: {status}")));
        }

        Ok(())
    }
}
