//! REST client for the mail backend.

use std::time::Duration;

use log::debug;
use reqwest::Client;

use super::error::{MailApiError, Result};
use super::{Email, EmailDraft, EmailPatch, Folder};
use crate::config::{Config, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::http;

/// Client for the mail REST API (`/emails` and friends).
///
/// Stateless aside from the connection pool: every call re-fetches, no
/// response is cached. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct MailClient {
    http: Client,
    base_url: String,
}

impl MailClient {
    /// Creates a client for the given base URL, e.g.
    /// `http://localhost:8000/api`.
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
        Self::with_timeout(config.mail_api_url.clone(), config.http_timeout)
    }

    /// Lists emails, optionally filtered by folder. Order is whatever
    /// the backend returns (newest first).
    pub async fn list_emails(&self, folder: Option<Folder>) -> Result<Vec<Email>> {
        let mut request = self.http.get(self.url("/emails"));
        if let Some(folder) = folder {
            request = request.query(&[("folder", folder.as_str())]);
        }

        let response = Self::ok(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Fetches a single email. The backend marks unread inbox mail as
    /// read as a side effect of this call.
    pub async fn get_email(&self, id: &str) -> Result<Email> {
        let response = self
            .http
            .get(self.url(&format!("/emails/{}", id)))
            .send()
            .await?;
        let response = Self::ok(response).await.map_err(|e| not_found(e, id))?;
        Ok(response.json().await?)
    }

    /// Creates (sends) a new email.
    pub async fn create_email(&self, draft: &EmailDraft) -> Result<Email> {
        debug!("Creating email to {}", draft.recipient);
        let response = self
            .http
            .post(self.url("/emails"))
            .json(draft)
            .send()
            .await?;
        let response = Self::ok(response).await?;
        Ok(response.json().await?)
    }

    /// Replies to an existing email. The backend re-addresses the reply
    /// into the thread: the subject gains an "RE: " prefix and the reply
    /// lands in the sent folder.
    pub async fn reply_to_email(&self, id: &str, draft: &EmailDraft) -> Result<Email> {
        debug!("Replying to email {}", id);
        let response = self
            .http
            .post(self.url(&format!("/emails/{}/reply", id)))
            .json(draft)
            .send()
            .await?;
        let response = Self::ok(response).await.map_err(|e| not_found(e, id))?;
        Ok(response.json().await?)
    }

    /// Applies a partial update to an email.
    pub async fn update_email(&self, id: &str, patch: &EmailPatch) -> Result<Email> {
        let response = self
            .http
            .patch(self.url(&format!("/emails/{}", id)))
            .json(patch)
            .send()
            .await?;
        let response = Self::ok(response).await.map_err(|e| not_found(e, id))?;
        Ok(response.json().await?)
    }

    /// Deletes an email. The backend answers 204 with no body.
    pub async fn delete_email(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/emails/{}", id)))
            .send()
            .await?;
        Self::ok(response).await.map_err(|e| not_found(e, id))?;
        Ok(())
    }

    /// Marks an email as read. Convenience wrapper over `update_email`.
    pub async fn mark_as_read(&self, id: &str) -> Result<Email> {
        self.update_email(id, &EmailPatch::read()).await
    }

    /// Unread inbox emails, the default working set for automation.
    pub async fn unread_inbox(&self) -> Result<Vec<Email>> {
        let emails = self.list_emails(Some(Folder::Inbox)).await?;
        Ok(emails.into_iter().filter(|e| !e.is_read).collect())
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
        Err(MailApiError::Api { status, detail })
    }
}

/// Maps a 404 API error onto the typed not-found variant.
fn not_found(err: MailApiError, id: &str) -> MailApiError {
    match err {
        MailApiError::Api { status: 404, .. } => MailApiError::NotFound { id: id.to_string() },
        other => other,
    }
}
