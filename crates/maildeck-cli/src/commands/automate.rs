//! Automation commands: launch a processing job and watch it settle.

use maildeck::automation::{
    launch, ActionLevel, ActionReview, AutomationClient, JobPoller, LaunchOutcome, PollOutcome,
    PollSnapshot, PollerState, Selection,
};
use maildeck::email::{Email, MailClient};
use maildeck::timestamp;
use maildeck::{Config, Job, Result};

pub async fn automate(
    config: &Config,
    select: Option<&str>,
    level: ActionLevel,
    apply: bool,
) -> Result<()> {
    let mail = MailClient::from_config(config)?;
    let automation = AutomationClient::from_config(config)?;

    let candidates = mail.unread_inbox().await?;
    let selection = match select {
        Some(ids) => Selection::Ids(
            ids.split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        ),
        None => Selection::All,
    };

    match launch(&automation, &candidates, &selection, level).await? {
        LaunchOutcome::NothingToProcess => {
            println!("Nothing to process: no unread emails matched the selection.");
            Ok(())
        }
        LaunchOutcome::Submitted(launched) => {
            println!(
                "{} ({} emails, job {})",
                launched.message, launched.email_count, launched.job_id
            );
            watch_job(config, automation, &launched.job_id, Some(&launched.emails), apply).await
        }
    }
}

pub async fn watch(config: &Config, job_id: &str, apply: bool) -> Result<()> {
    let automation = AutomationClient::from_config(config)?;
    watch_job(config, automation, job_id, None, apply).await
}

async fn watch_job(
    config: &Config,
    automation: AutomationClient,
    job_id: &str,
    emails: Option<&[Email]>,
    apply: bool,
) -> Result<()> {
    let (poller, _handle) = JobPoller::new(automation.clone(), job_id, config.poll_interval);
    let mut snapshots = poller.subscribe();

    // Render snapshots while the poller drives the fetches. The loop
    // ends when the terminal snapshot arrives or the poller is dropped.
    let printer = tokio::spawn(async move {
        let mut printed_operations = 0usize;
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            printed_operations = render_snapshot(&snapshot, printed_operations);
            if snapshot.state.is_terminal() {
                break;
            }
        }
    });

    let outcome = poller.run().await;
    let _ = printer.await;

    match outcome {
        PollOutcome::Completed(job) => {
            println!("Completed: {} emails processed", job.progress_summary());
            if let Some(report) = job.review_report.as_deref() {
                println!("\nReview report:\n{}", report);
            }
            summarize_actions(&job, emails);
            if apply {
                apply_actions(&automation, &job).await;
            }
            Ok(())
        }
        PollOutcome::Failed { reason, .. } => {
            eprintln!("Processing failed: {}", reason);
            std::process::exit(1);
        }
        PollOutcome::Cancelled => Ok(()),
    }
}

/// Prints the progress header on the first fetch and appends newly
/// logged operations; returns how many operations have been printed.
fn render_snapshot(snapshot: &PollSnapshot, already_printed: usize) -> usize {
    if let Some(error) = &snapshot.last_error {
        eprintln!("{}", error);
        return already_printed;
    }

    match &snapshot.state {
        PollerState::Loading => already_printed,
        PollerState::Active(job)
        | PollerState::Completed(job)
        | PollerState::Failed { job, .. } => {
            let mut printed = already_printed;
            if printed == 0 {
                println!(
                    "Job {} [{}] {}",
                    job.job_id,
                    job.status,
                    job.progress_summary()
                );
            }
            for operation in job.operations.iter().skip(printed) {
                println!(
                    "  {} {}  {}",
                    timestamp::format_time(&operation.timestamp()),
                    operation.icon(),
                    operation.describe()
                );
                printed += 1;
            }
            printed
        }
    }
}

fn summarize_actions(job: &Job, emails: Option<&[Email]>) {
    let review = ActionReview::from_job(job);
    if review.is_empty() {
        return;
    }

    println!(
        "\nActions: {} replies, {} unsubscribes, {} other",
        review.replies.len(),
        review.unsubscribes.len(),
        review.others.len()
    );
    for action in review
        .replies
        .iter()
        .chain(review.unsubscribes.iter())
        .chain(review.others.iter())
    {
        let subject = action
            .email_id
            .as_deref()
            .and_then(|id| emails.and_then(|list| list.iter().find(|email| email.id == id)))
            .map(|email| email.subject.as_str())
            .unwrap_or("Unknown subject");
        let kind = action
            .action
            .as_ref()
            .map(|action| action.as_str())
            .unwrap_or("action");
        println!("  {:<12} {}", kind, subject);
    }
}

async fn apply_actions(client: &AutomationClient, job: &Job) {
    let mut review = ActionReview::from_job(job);
    if review.is_empty() {
        println!("No actions to apply.");
        return;
    }

    let summary = review.apply_all(client).await;
    println!(
        "Applied {} actions ({} skipped, {} failed)",
        summary.applied, summary.skipped, summary.failed
    );
    for error in &summary.errors {
        eprintln!("  {}", error);
    }
}
