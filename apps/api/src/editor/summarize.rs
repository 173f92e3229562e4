//! Summary generation: describes the resume in prose and asks the
//! summarization service for a polished professional summary.
//!
//! The service is an opaque POST `{ "describe": ... }` → `{ "summary"?: ... }`.
//! No retry: the editor substitutes `FALLBACK_SUMMARY` on any failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::ResumeDocument;

/// Written to `summary` when the service call fails.
pub const FALLBACK_SUMMARY: &str = "Experienced professional with proven success in various roles.";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response body is not JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a successful call. `summary` is `None` when the response did not
/// carry a usable string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryResponse {
    pub summary: Option<String>,
}

impl SummaryResponse {
    /// Reads `summary` out of any JSON value; other shapes yield `None`.
    pub fn from_json(value: &Value) -> Self {
        let summary = value
            .get("summary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { summary }
    }
}

/// The summarization service seam. `HttpSummaryClient` is the production backend.
#[async_trait]
pub trait SummaryClient: Send + Sync {
    async fn summarize(&self, describe: &str) -> Result<SummaryResponse, SummaryError>;
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    describe: &'a str,
}

/// POSTs the description as JSON to the configured endpoint.
#[derive(Clone)]
pub struct HttpSummaryClient {
    client: Client,
    endpoint: String,
}

impl HttpSummaryClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SummaryError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SummaryClient for HttpSummaryClient {
    async fn summarize(&self, describe: &str) -> Result<SummaryResponse, SummaryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SummaryRequest { describe })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Status is not a failure on its own; only an unreadable body is.
            warn!("Summary service returned {status}");
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        let parsed = SummaryResponse::from_json(&value);

        debug!(
            "Summary service responded (status={}, has_summary={})",
            status,
            parsed.summary.is_some()
        );
        Ok(parsed)
    }
}

/// Builds the prose description sent to the service: name, roles, degrees,
/// skills. Every entry is listed as entered, blank ones included.
pub fn build_description(document: &ResumeDocument) -> String {
    let roles = document
        .experience
        .iter()
        .map(|e| format!("{} at {}", e.position, e.company))
        .collect::<Vec<_>>()
        .join(", ");

    let degrees = document
        .education
        .iter()
        .map(|e| format!("{} from {}", e.degree, e.school))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} has experience in: {}.\nEducation includes: {}.\nSkills: {}.",
        document.personal_info.name,
        roles,
        degrees,
        document.skills.join(", ")
    )
}
