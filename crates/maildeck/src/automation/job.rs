//! Job and operation model for the automation service.
//!
//! `GET /job-status/{job_id}` returns a read-only projection of a
//! server-side processing job. The operation log is an append-only,
//! time-ordered history; each entry is a tagged variant keyed by the
//! wire field `type`, with unrecognized types preserved as generic
//! operations so the feed stays renderable.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Risk level the automation engine is allowed to act at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ActionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLevel::Low => "low",
            ActionLevel::Medium => "medium",
            ActionLevel::High => "high",
        }
    }
}

impl fmt::Display for ActionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(ActionLevel::Low),
            "medium" => Ok(ActionLevel::Medium),
            "high" => Ok(ActionLevel::High),
            other => Err(format!(
                "unknown action level '{}', expected low, medium or high",
                other
            )),
        }
    }
}

/// Lifecycle status of a processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Initialized,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// True for `completed` and `error`. A job never transitions out of
    /// a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Initialized => "initialized",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Kind of action the automation engine performed on an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailAction {
    Reply,
    Unsubscribe,
    /// Any other action kind; preserved verbatim.
    #[serde(untagged)]
    Other(String),
}

impl EmailAction {
    pub fn as_str(&self) -> &str {
        match self {
            EmailAction::Reply => "reply",
            EmailAction::Unsubscribe => "unsubscribe",
            EmailAction::Other(kind) => kind,
        }
    }
}

impl fmt::Display for EmailAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged event in a job's processing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// An email went through the pipeline.
    EmailProcessed {
        #[serde(with = "crate::timestamp::lenient")]
        timestamp: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
    /// The engine performed an action (reply, unsubscribe, ...) on an
    /// email. For replies `content` carries the generated text.
    EmailActionPerformed {
        #[serde(with = "crate::timestamp::lenient")]
        timestamp: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<EmailAction>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
    },
    /// An email was flagged for human review.
    HumanReviewRequired {
        #[serde(with = "crate::timestamp::lenient")]
        timestamp: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
    },
    /// A batch of emails was routed to the review queue.
    EmailsAddedToReview {
        #[serde(with = "crate::timestamp::lenient")]
        timestamp: DateTime<Utc>,
        #[serde(default)]
        email_ids: Vec<String>,
    },
    /// A batch of emails was routed to automated handling.
    EmailsAddedToAutomation {
        #[serde(with = "crate::timestamp::lenient")]
        timestamp: DateTime<Utc>,
        #[serde(default)]
        email_ids: Vec<String>,
    },
    /// The review report was written.
    ReviewReportAdded {
        #[serde(with = "crate::timestamp::lenient")]
        timestamp: DateTime<Utc>,
    },
    /// Any operation type this client does not know about (the service
    /// also emits e.g. `email_review_added`).
    #[serde(untagged)]
    Other(GenericOperation),
}

/// Fallback shape for unrecognized operation types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericOperation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "crate::timestamp::lenient")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email_ids: Vec<String>,
}

/// Icon associated with an operation, for activity-feed rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationIcon {
    Mail,
    Reply,
    Unsubscribe,
    Action,
    Review,
    Info,
}

impl OperationIcon {
    /// Terminal glyph for this icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            OperationIcon::Mail => "✉",
            OperationIcon::Reply => "↩",
            OperationIcon::Unsubscribe => "⊘",
            OperationIcon::Action => "✓",
            OperationIcon::Review => "⚑",
            OperationIcon::Info => "ℹ",
        }
    }
}

impl fmt::Display for OperationIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl Operation {
    /// Wire name of this operation's type.
    pub fn kind(&self) -> &str {
        match self {
            Operation::EmailProcessed { .. } => "email_processed",
            Operation::EmailActionPerformed { .. } => "email_action_performed",
            Operation::HumanReviewRequired { .. } => "human_review_required",
            Operation::EmailsAddedToReview { .. } => "emails_added_to_review",
            Operation::EmailsAddedToAutomation { .. } => "emails_added_to_automation",
            Operation::ReviewReportAdded { .. } => "review_report_added",
            Operation::Other(generic) => &generic.kind,
        }
    }

    /// When this operation was logged.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Operation::EmailProcessed { timestamp, .. }
            | Operation::EmailActionPerformed { timestamp, .. }
            | Operation::HumanReviewRequired { timestamp, .. }
            | Operation::EmailsAddedToReview { timestamp, .. }
            | Operation::EmailsAddedToAutomation { timestamp, .. }
            | Operation::ReviewReportAdded { timestamp } => *timestamp,
            Operation::Other(generic) => generic.timestamp,
        }
    }

    /// Every email id this operation references, with the singular
    /// `email_id` and plural `email_ids` shapes flattened together.
    pub fn email_ids(&self) -> Vec<&str> {
        match self {
            Operation::EmailProcessed { email_id, .. }
            | Operation::EmailActionPerformed { email_id, .. }
            | Operation::HumanReviewRequired { email_id, .. } => {
                email_id.iter().map(String::as_str).collect()
            }
            Operation::EmailsAddedToReview { email_ids, .. }
            | Operation::EmailsAddedToAutomation { email_ids, .. } => {
                email_ids.iter().map(String::as_str).collect()
            }
            Operation::ReviewReportAdded { .. } => Vec::new(),
            Operation::Other(generic) => generic
                .email_id
                .iter()
                .chain(generic.email_ids.iter())
                .map(String::as_str)
                .collect(),
        }
    }

    /// Human-readable one-line description. Total over every operation
    /// type; unknown types fall back to the humanized type string.
    pub fn describe(&self) -> String {
        match self {
            Operation::EmailProcessed { sender, .. } => format!(
                "Processed email from {}",
                sender.as_deref().unwrap_or("unknown sender")
            ),
            Operation::EmailActionPerformed { action, sender, .. } => {
                let sender = sender.as_deref().unwrap_or("sender");
                match action {
                    Some(EmailAction::Reply) => format!("Generated reply to {}", sender),
                    Some(EmailAction::Unsubscribe) => format!("Unsubscribed from {}", sender),
                    Some(EmailAction::Other(kind)) => format!("Performed {} on email", kind),
                    None => "Performed action on email".to_string(),
                }
            }
            Operation::HumanReviewRequired { sender, .. } => format!(
                "Flagged email from {} for review",
                sender.as_deref().unwrap_or("sender")
            ),
            other => humanize(other.kind()),
        }
    }

    /// Icon for the activity feed. Total, with `Info` for everything
    /// that has no dedicated icon.
    pub fn icon(&self) -> OperationIcon {
        match self {
            Operation::EmailProcessed { .. } => OperationIcon::Mail,
            Operation::EmailActionPerformed { action, .. } => match action {
                Some(EmailAction::Reply) => OperationIcon::Reply,
                Some(EmailAction::Unsubscribe) => OperationIcon::Unsubscribe,
                _ => OperationIcon::Action,
            },
            Operation::HumanReviewRequired { .. } => OperationIcon::Review,
            _ => OperationIcon::Info,
        }
    }
}

/// Turns a wire type name into display prose, e.g.
/// `emails_added_to_review` into "emails added to review".
fn humanize(kind: &str) -> String {
    kind.replace('_', " ")
}

/// Acknowledgement returned when a processing batch is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEmailsResponse {
    pub job_id: String,
    pub message: String,
    pub email_count: u32,
}

/// Read-only projection of a processing job.
///
/// Immutable once `status` is terminal; counts are monotonically
/// non-decreasing while the job is live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    pub total_emails: u32,
    pub processed_emails: u32,
    pub human_review_count: u32,
    pub automation_count: u32,
    /// Review report text; the backend sends an empty string when there
    /// is none.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_report: Option<String>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// True once the job has reached `completed` or `error`.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress summary, e.g. "4 / 10".
    pub fn progress_summary(&self) -> String {
        format!("{} / {}", self.processed_emails, self.total_emails)
    }

    /// The de-duplicated union of every email id referenced by the
    /// operation log, in first-touch order.
    pub fn touched_email_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for operation in &self.operations {
            for id in operation.email_ids() {
                if seen.insert(id.to_string()) {
                    ids.push(id.to_string());
                }
            }
        }
        ids
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
