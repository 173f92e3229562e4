//! Persistence. Ships the whole document to the remote resume store.
//! Fire-and-forget: nothing is read back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::resume::ResumeDocument;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store rejected resume (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn save(&self, document: &ResumeDocument) -> Result<(), SaveError>;
}

/// POSTs the document JSON; any 2xx is success.
#[derive(Clone)]
pub struct HttpResumeStore {
    client: Client,
    endpoint: String,
}

impl HttpResumeStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SaveError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ResumeStore for HttpResumeStore {
    async fn save(&self, document: &ResumeDocument) -> Result<(), SaveError> {
        let response = self.client.post(&self.endpoint).json(document).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SaveError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Resume store accepted document (status={status})");
        Ok(())
    }
}
