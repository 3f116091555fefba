//! Automation service error types.

use thiserror::Error;

/// Errors surfaced by the automation client.
#[derive(Error, Debug)]
pub enum AutomationError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// The polled job does not exist (anymore) on the service.
    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: String },
}

/// Result type for automation operations.
pub type Result<T> = std::result::Result<T, AutomationError>;
