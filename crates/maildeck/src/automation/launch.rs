//! Automation launch flow: working-set selection and batch submission.

use log::info;

use super::client::AutomationClient;
use super::error::Result;
use super::job::ActionLevel;
use crate::email::Email;

/// Which of the candidate emails to hand to the automation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every candidate.
    All,
    /// An explicit subset, by email id. Ids not present among the
    /// candidates are ignored.
    Ids(Vec<String>),
}

impl Selection {
    /// Resolves the working set against the candidate emails.
    pub fn resolve(&self, candidates: &[Email]) -> Vec<Email> {
        match self {
            Selection::All => candidates.to_vec(),
            Selection::Ids(ids) => candidates
                .iter()
                .filter(|email| ids.contains(&email.id))
                .cloned()
                .collect(),
        }
    }
}

/// A successfully submitted processing batch.
#[derive(Debug, Clone)]
pub struct LaunchedJob {
    pub job_id: String,
    pub message: String,
    pub email_count: u32,
    /// The emails that were submitted, kept for the action review.
    pub emails: Vec<Email>,
}

/// Outcome of a launch attempt.
#[derive(Debug, Clone)]
pub enum LaunchOutcome {
    /// The batch was accepted; poll the job for progress.
    Submitted(LaunchedJob),
    /// The working set was empty; the service was not contacted.
    NothingToProcess,
}

/// Submits the selected working set for automated processing.
///
/// An empty working set is a no-op signal, not an error: the automation
/// service is never contacted for it.
pub async fn launch(
    client: &AutomationClient,
    candidates: &[Email],
    selection: &Selection,
    action_level: ActionLevel,
) -> Result<LaunchOutcome> {
    let working_set = selection.resolve(candidates);
    if working_set.is_empty() {
        info!("Working set is empty, skipping automation submit");
        return Ok(LaunchOutcome::NothingToProcess);
    }

    let accepted = client.process_emails(&working_set, action_level).await?;
    info!(
        "Automation job {} accepted ({} emails)",
        accepted.job_id, accepted.email_count
    );

    Ok(LaunchOutcome::Submitted(LaunchedJob {
        job_id: accepted.job_id,
        message: accepted.message,
        email_count: accepted.email_count,
        emails: working_set,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::Folder;

    fn email(id: &str) -> Email {
        Email {
            id: id.to_string(),
            sender: "sender@example.com".to_string(),
            recipient: "user@example.com".to_string(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
            timestamp: crate::timestamp::parse("2025-03-13T15:30:30Z").unwrap(),
            is_read: false,
            folder: Folder::Inbox,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_select_all() {
        let candidates = vec![email("e1"), email("e2")];
        let resolved = Selection::All.resolve(&candidates);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_select_subset_ignores_unknown_ids() {
        let candidates = vec![email("e1"), email("e2"), email("e3")];
        let selection = Selection::Ids(vec!["e3".to_string(), "nope".to_string()]);
        let resolved = selection.resolve(&candidates);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "e3");
    }

    #[test]
    fn test_empty_selection_resolves_empty() {
        let candidates = vec![email("e1")];
        assert!(Selection::Ids(Vec::new()).resolve(&candidates).is_empty());
        assert!(Selection::All.resolve(&[]).is_empty());
    }
}
