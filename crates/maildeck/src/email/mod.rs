//! Email data model and REST client for the mail backend.
//!
//! The mail backend is authoritative for all email state; this module
//! only holds transient, re-fetchable projections of it.

pub mod client;
pub mod error;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::MailClient;
pub use error::MailApiError;

/// Mail folder an email lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    Inbox,
    Sent,
}

impl Folder {
    /// Query-string value for this folder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Inbox => "inbox",
            Folder::Sent => "sent",
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Folder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inbox" => Ok(Folder::Inbox),
            "sent" => Ok(Folder::Sent),
            other => Err(format!(
                "unknown folder '{}', expected 'inbox' or 'sent'",
                other
            )),
        }
    }
}

/// A single email as returned by the mail backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    #[serde(with = "crate::timestamp::lenient")]
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub folder: Folder,
    /// Attachment names; most demo emails have none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// Payload for creating an email or a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Partial update for an email. Only `is_read` is supported by the
/// backend today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
}

impl EmailPatch {
    /// Patch that marks an email as read.
    pub fn read() -> Self {
        Self { is_read: Some(true) }
    }
}
