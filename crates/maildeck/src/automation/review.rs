//! Post-completion action review: partition the performed actions of a
//! completed job and apply them against the backends.

use std::collections::HashSet;

use log::{debug, warn};

use super::client::AutomationClient;
use super::job::{EmailAction, Job, Operation};

/// One reviewable action extracted from the operation log.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAction {
    pub email_id: Option<String>,
    pub action: Option<EmailAction>,
    /// Generated reply text, when the action is a reply.
    pub content: Option<String>,
    pub sender: Option<String>,
}

/// What happened to a single action on apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStatus {
    /// The backend call succeeded; the email id is now flagged applied.
    Applied,
    /// Already applied, or the action has no target email id.
    Skipped,
    /// The backend call failed; remaining actions still run.
    Failed(String),
}

/// Aggregate result of `apply_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    /// One message per failed action.
    pub errors: Vec<String>,
}

/// Performed actions of a completed job, partitioned by kind.
///
/// Application is idempotent per email id: the applied flag survives
/// across `apply` and `apply_all` calls on the same review.
#[derive(Debug, Clone)]
pub struct ActionReview {
    pub replies: Vec<ReviewAction>,
    pub unsubscribes: Vec<ReviewAction>,
    pub others: Vec<ReviewAction>,
    applied: HashSet<String>,
}

impl ActionReview {
    /// Partitions the job's performed actions into reply, unsubscribe
    /// and other buckets, preserving log order within each bucket.
    pub fn from_job(job: &Job) -> Self {
        let mut review = Self {
            replies: Vec::new(),
            unsubscribes: Vec::new(),
            others: Vec::new(),
            applied: HashSet::new(),
        };

        for operation in &job.operations {
            if let Operation::EmailActionPerformed {
                email_id,
                action,
                content,
                sender,
                ..
            } = operation
            {
                let item = ReviewAction {
                    email_id: email_id.clone(),
                    action: action.clone(),
                    content: content.clone(),
                    sender: sender.clone(),
                };
                match action {
                    Some(EmailAction::Reply) => review.replies.push(item),
                    Some(EmailAction::Unsubscribe) => review.unsubscribes.push(item),
                    _ => review.others.push(item),
                }
            }
        }

        review
    }

    /// Total number of reviewable actions.
    pub fn len(&self) -> usize {
        self.replies.len() + self.unsubscribes.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when an action targeting this email id has been applied.
    pub fn is_applied(&self, email_id: &str) -> bool {
        self.applied.contains(email_id)
    }

    /// Applies a single action. Replies with generated content are sent
    /// as replies; everything else is marked read.
    pub async fn apply(&mut self, client: &AutomationClient, action: &ReviewAction) -> ApplyStatus {
        let email_id = match action.email_id.as_deref() {
            Some(id) => id,
            None => {
                debug!("Skipping action without an email id");
                return ApplyStatus::Skipped;
            }
        };
        if self.applied.contains(email_id) {
            return ApplyStatus::Skipped;
        }

        let result = match (&action.action, action.content.as_deref()) {
            (Some(EmailAction::Reply), Some(content)) => {
                client.send_reply(email_id, content).await
            }
            _ => client.mark_as_read(&[email_id.to_string()]).await,
        };

        match result {
            Ok(()) => {
                self.applied.insert(email_id.to_string());
                ApplyStatus::Applied
            }
            Err(err) => {
                let message = format!("Failed to apply action to email {}: {}", email_id, err);
                warn!("{}", message);
                ApplyStatus::Failed(message)
            }
        }
    }

    /// Applies every pending action, strictly sequentially, in bucket
    /// order: replies, then unsubscribes, then the rest. Failures are
    /// accumulated and do not stop the remaining actions.
    pub async fn apply_all(&mut self, client: &AutomationClient) -> ApplySummary {
        let pending: Vec<ReviewAction> = self
            .replies
            .iter()
            .chain(self.unsubscribes.iter())
            .chain(self.others.iter())
            .cloned()
            .collect();

        let mut summary = ApplySummary::default();
        for action in &pending {
            match self.apply(client, action).await {
                ApplyStatus::Applied => summary.applied += 1,
                ApplyStatus::Skipped => summary.skipped += 1,
                ApplyStatus::Failed(message) => {
                    summary.failed += 1;
                    summary.errors.push(message);
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::job::JobStatus;
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        crate::timestamp::parse("2025-03-15T09:31:00Z").unwrap()
    }

    fn action_op(email_id: &str, action: EmailAction, content: Option<&str>) -> Operation {
        Operation::EmailActionPerformed {
            timestamp: ts(),
            email_id: Some(email_id.to_string()),
            action: Some(action),
            result: Some("success".to_string()),
            content: content.map(str::to_string),
            sender: None,
        }
    }

    fn completed_job(operations: Vec<Operation>) -> Job {
        Job {
            job_id: "j-1".to_string(),
            status: JobStatus::Completed,
            total_emails: operations.len() as u32,
            processed_emails: operations.len() as u32,
            human_review_count: 0,
            automation_count: operations.len() as u32,
            review_report: None,
            operations,
            error: None,
        }
    }

    #[test]
    fn test_partition_by_action_kind() {
        let job = completed_job(vec![
            action_op("e1", EmailAction::Reply, Some("Thanks!")),
            action_op("e2", EmailAction::Unsubscribe, None),
            action_op("e3", EmailAction::Other("archive".to_string()), None),
            action_op("e4", EmailAction::Reply, Some("On it.")),
            Operation::ReviewReportAdded { timestamp: ts() },
        ]);

        let review = ActionReview::from_job(&job);
        assert_eq!(review.replies.len(), 2);
        assert_eq!(review.unsubscribes.len(), 1);
        assert_eq!(review.others.len(), 1);
        assert_eq!(review.len(), 4);
        // Log order is preserved within a bucket.
        assert_eq!(review.replies[0].email_id.as_deref(), Some("e1"));
        assert_eq!(review.replies[1].email_id.as_deref(), Some("e4"));
    }

    #[test]
    fn test_non_action_operations_are_ignored() {
        let job = completed_job(vec![
            Operation::EmailsAddedToAutomation {
                timestamp: ts(),
                email_ids: vec!["e1".to_string()],
            },
            Operation::ReviewReportAdded { timestamp: ts() },
        ]);

        let review = ActionReview::from_job(&job);
        assert!(review.is_empty());
    }

    #[test]
    fn test_action_without_kind_lands_in_others() {
        let job = completed_job(vec![Operation::EmailActionPerformed {
            timestamp: ts(),
            email_id: Some("e1".to_string()),
            action: None,
            result: None,
            content: None,
            sender: None,
        }]);

        let review = ActionReview::from_job(&job);
        assert_eq!(review.others.len(), 1);
    }
}
