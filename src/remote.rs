//! Best-effort copy of each generation to a remote document store.

use crate::config::Config;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum RemoteSaveError {
    #[error("Archive request failed: {0}")]
    Network(String),

    #[error("Archive rejected the record with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to create archive client: {0}")]
    Configuration(String),
}

/// One generation as stored remotely.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    pub user_id: String,
    pub feature: String,
    pub input: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub user_email: String,
    pub user_name: String,
}

#[async_trait]
pub trait RemoteArchive: Send + Sync {
    async fn append(&self, record: &ArchiveRecord) -> Result<(), RemoteSaveError>;
}

/// POSTs each record as JSON to a collection URL.
pub struct HttpArchive {
    client: Client,
    url: String,
}

impl HttpArchive {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteSaveError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteSaveError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// `None` when no archive URL is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, RemoteSaveError> {
        match config.archive_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(Some(Self::new(
                url,
                Duration::from_secs(config.request_timeout_seconds),
            )?)),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl RemoteArchive for HttpArchive {
    #[instrument(skip(self, record), fields(feature = %record.feature))]
    async fn append(&self, record: &ArchiveRecord) -> Result<(), RemoteSaveError> {
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| RemoteSaveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteSaveError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Archived generation");
        Ok(())
    }
}
