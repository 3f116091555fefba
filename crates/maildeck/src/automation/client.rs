//! HTTP client for the automation service.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::Serialize;

use super::error::{AutomationError, Result};
use super::job::{ActionLevel, Job, ProcessEmailsResponse};
use crate::config::{Config, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::email::Email;
use crate::http;

/// Client for the automation service (`/process-emails` and friends).
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct AutomationClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ProcessEmailsRequest<'a> {
    emails: &'a [Email],
    action_level: ActionLevel,
}

#[derive(Debug, Serialize)]
struct MarkAsReadRequest<'a> {
    email_ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct SendReplyRequest<'a> {
    email_id: &'a str,
    content: &'a str,
}

impl AutomationClient {
    /// Creates a client for the given base URL, e.g.
    /// `http://localhost:4000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Creates a client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            http: http::build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(config.automation_api_url.clone(), config.http_timeout)
    }

    /// Submits a batch of emails for automated processing. The job runs
    /// server-side; poll `job_status` for progress.
    pub async fn process_emails(
        &self,
        emails: &[Email],
        action_level: ActionLevel,
    ) -> Result<ProcessEmailsResponse> {
        debug!(
            "Submitting {} emails at action level {}",
            emails.len(),
            action_level
        );
        let response = self
            .http
            .post(self.url("/process-emails"))
            .json(&ProcessEmailsRequest {
                emails,
                action_level,
            })
            .send()
            .await?;
        let response = Self::ok(response).await?;
        Ok(response.json().await?)
    }

    /// Fetches the current status projection for a job.
    pub async fn job_status(&self, job_id: &str) -> Result<Job> {
        let response = self
            .http
            .get(self.url(&format!("/job-status/{}", job_id)))
            .send()
            .await?;
        let response = Self::ok(response).await.map_err(|e| match e {
            AutomationError::Api { status: 404, .. } => AutomationError::JobNotFound {
                job_id: job_id.to_string(),
            },
            other => other,
        })?;
        Ok(response.json().await?)
    }

    /// Marks a batch of emails as read.
    pub async fn mark_as_read(&self, email_ids: &[String]) -> Result<()> {
        let response = self
            .http
            .post(self.url("/mark-as-read"))
            .json(&MarkAsReadRequest { email_ids })
            .send()
            .await?;
        Self::ok(response).await?;
        Ok(())
    }

    /// Sends a generated reply for an email.
    pub async fn send_reply(&self, email_id: &str, content: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url("/send-reply"))
            .json(&SendReplyRequest { email_id, content })
            .send()
            .await?;
        Self::ok(response).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-2xx response into an error, consulting the body for a
    /// `detail` field.
    async fn ok(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let (status, detail) = http::error_detail(response).await;
        Err(AutomationError::Api { status, detail })
    }
}
