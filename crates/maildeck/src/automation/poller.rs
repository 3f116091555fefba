//! Job status poller: fixed-cadence status fetches until a terminal
//! state, then a one-time completion side effect.
//!
//! The lifecycle is an explicit state machine driven by a single
//! transition function; a terminal state is absorbing and ends the
//! polling loop. Fetches are strictly sequential: a new
//! fetch is never issued while one is outstanding, and a slow response
//! delays the next tick instead of bursting.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use super::client::AutomationClient;
use super::job::{Job, JobStatus};

/// Message surfaced when a status fetch fails; polling continues.
const FETCH_FAILED_MESSAGE: &str = "Failed to fetch job status. Please try again.";

/// Fallback failure reason when an errored job carries no message.
const GENERIC_FAILURE: &str = "Email processing failed";

/// Observable lifecycle of a polled job.
#[derive(Debug, Clone, PartialEq)]
pub enum PollerState {
    /// No status has been fetched yet.
    Loading,
    /// The job is initialized or processing.
    Active(Job),
    /// Terminal: the job finished successfully.
    Completed(Job),
    /// Terminal: the job failed.
    Failed { job: Job, reason: String },
}

impl PollerState {
    /// True once a terminal status has been recorded.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollerState::Completed(_) | PollerState::Failed { .. })
    }

    /// The current job projection, if any has been fetched.
    pub fn job(&self) -> Option<&Job> {
        match self {
            PollerState::Loading => None,
            PollerState::Active(job)
            | PollerState::Completed(job)
            | PollerState::Failed { job, .. } => Some(job),
        }
    }

    /// Transition on a successfully fetched status. The fetched job
    /// replaces the projection wholesale; a terminal state is absorbing.
    pub fn observe(self, job: Job) -> PollerState {
        if self.is_terminal() {
            return self;
        }
        match job.status {
            JobStatus::Completed => PollerState::Completed(job),
            JobStatus::Error => {
                let reason = job
                    .error
                    .clone()
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                PollerState::Failed { job, reason }
            }
            JobStatus::Initialized | JobStatus::Processing => PollerState::Active(job),
        }
    }
}

/// Snapshot published to subscribers after every fetch attempt.
#[derive(Debug, Clone)]
pub struct PollSnapshot {
    pub state: PollerState,
    /// Set while the most recent fetch failed; cleared on the next
    /// successful fetch.
    pub last_error: Option<String>,
}

/// Result of driving a poller to rest.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Completed(Job),
    Failed { job: Job, reason: String },
    /// The caller tore the poller down before a terminal state.
    Cancelled,
}

/// Requests an early teardown of a running poller.
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
}

impl PollerHandle {
    /// Stops the associated poller at the next opportunity.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Polls `GET /job-status/{job_id}` until the job reaches a terminal
/// state or the handle tears it down, whichever comes first. No timer
/// outlives the returned future.
pub struct JobPoller {
    client: AutomationClient,
    job_id: String,
    interval: Duration,
    snapshot_tx: watch::Sender<PollSnapshot>,
    shutdown_rx: watch::Receiver<bool>,
}

impl JobPoller {
    /// Creates a poller with the given cadence, alongside its teardown
    /// handle.
    pub fn new(
        client: AutomationClient,
        job_id: impl Into<String>,
        interval: Duration,
    ) -> (Self, PollerHandle) {
        let (snapshot_tx, _) = watch::channel(PollSnapshot {
            state: PollerState::Loading,
            last_error: None,
        });
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        (
            Self {
                client,
                job_id: job_id.into(),
                interval,
                snapshot_tx,
                shutdown_rx,
            },
            PollerHandle {
                shutdown: shutdown_tx,
            },
        )
    }

    /// The job this poller is attached to.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Subscribes to state snapshots. The latest value is visible
    /// immediately; later values replace it wholesale.
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Drives the poller to rest. The first fetch happens immediately,
    /// then one per interval.
    pub async fn run(mut self) -> PollOutcome {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut state = PollerState::Loading;
        let mut shutdown_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = self.shutdown_rx.changed(), if shutdown_open => {
                    match changed {
                        Ok(()) if *self.shutdown_rx.borrow() => {
                            debug!("Poller for job {} torn down", self.job_id);
                            return PollOutcome::Cancelled;
                        }
                        Ok(()) => {}
                        // Handle dropped without a shutdown; keep polling.
                        Err(_) => shutdown_open = false,
                    }
                    continue;
                }
            }

            match self.client.job_status(&self.job_id).await {
                Ok(job) => {
                    state = state.observe(job);
                    self.publish(PollSnapshot {
                        state: state.clone(),
                        last_error: None,
                    });

                    match &state {
                        PollerState::Completed(job) => {
                            info!(
                                "Job {} completed ({} operations)",
                                self.job_id,
                                job.operations.len()
                            );
                            self.mark_touched_emails_read(job).await;
                            return PollOutcome::Completed(job.clone());
                        }
                        PollerState::Failed { job, reason } => {
                            warn!("Job {} failed: {}", self.job_id, reason);
                            return PollOutcome::Failed {
                                job: job.clone(),
                                reason: reason.clone(),
                            };
                        }
                        PollerState::Loading | PollerState::Active(_) => {}
                    }
                }
                Err(err) => {
                    warn!("Failed to fetch status for job {}: {}", self.job_id, err);
                    self.publish(PollSnapshot {
                        state: state.clone(),
                        last_error: Some(FETCH_FAILED_MESSAGE.to_string()),
                    });
                }
            }
        }
    }

    /// Completion side effect: one batch mark-as-read over every email
    /// id the operation log touched. Runs at most once per job; failures
    /// are logged and swallowed.
    async fn mark_touched_emails_read(&self, job: &Job) {
        let email_ids = job.touched_email_ids();
        if email_ids.is_empty() {
            return;
        }
        match self.client.mark_as_read(&email_ids).await {
            Ok(()) => info!("Marked {} emails as read", email_ids.len()),
            Err(err) => warn!("Failed to mark emails as read: {}", err),
        }
    }

    fn publish(&self, snapshot: PollSnapshot) {
        // No subscribers is fine.
        let _ = self.snapshot_tx.send(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::job::JobStatus;

    fn job(status: JobStatus) -> Job {
        Job {
            job_id: "j-1".to_string(),
            status,
            total_emails: 10,
            processed_emails: 4,
            human_review_count: 0,
            automation_count: 4,
            review_report: None,
            operations: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn test_observe_progresses_to_active() {
        let state = PollerState::Loading.observe(job(JobStatus::Initialized));
        assert!(matches!(state, PollerState::Active(_)));
        assert!(!state.is_terminal());

        let state = state.observe(job(JobStatus::Processing));
        assert!(matches!(state, PollerState::Active(_)));
    }

    #[test]
    fn test_observe_completed_is_terminal() {
        let state = PollerState::Loading
            .observe(job(JobStatus::Processing))
            .observe(job(JobStatus::Completed));
        assert!(state.is_terminal());
        assert!(matches!(state, PollerState::Completed(_)));
    }

    #[test]
    fn test_observe_error_carries_reason() {
        let mut errored = job(JobStatus::Error);
        errored.error = Some("model quota exceeded".to_string());

        let state = PollerState::Loading.observe(errored);
        match &state {
            PollerState::Failed { reason, .. } => {
                assert_eq!(reason, "model quota exceeded");
            }
            other => panic!("expected failed state, got {:?}", other),
        }
    }

    #[test]
    fn test_observe_error_without_message_uses_generic_reason() {
        let state = PollerState::Loading.observe(job(JobStatus::Error));
        match &state {
            PollerState::Failed { reason, .. } => assert_eq!(reason, GENERIC_FAILURE),
            other => panic!("expected failed state, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_state_is_absorbing() {
        // Once terminal, later observations must not re-enter the
        // active lifecycle.
        let state = PollerState::Loading.observe(job(JobStatus::Completed));
        let again = state.clone().observe(job(JobStatus::Processing));
        assert_eq!(again, state);
    }

    #[test]
    fn test_replacement_is_wholesale() {
        let mut first = job(JobStatus::Processing);
        first.processed_emails = 2;
        let mut second = job(JobStatus::Processing);
        second.processed_emails = 7;

        let state = PollerState::Loading.observe(first).observe(second);
        assert_eq!(state.job().unwrap().processed_emails, 7);
    }
}
