//! Mail backend error types.

use thiserror::Error;

/// Errors surfaced by the mail REST client.
#[derive(Error, Debug)]
pub enum MailApiError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status. `detail` is the
    /// backend-supplied message when present.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// The requested email does not exist.
    #[error("Email with ID {id} not found")]
    NotFound { id: String },
}

impl MailApiError {
    /// True for the typed not-found outcome, which detail views render
    /// as a "not found" page instead of a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MailApiError::NotFound { .. })
    }
}

/// Result type for mail client operations.
pub type Result<T> = std::result::Result<T, MailApiError>;
