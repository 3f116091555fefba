//! Batch email automation: job submission, status polling and the
//! post-completion action review.
//!
//! The automation service owns the job lifecycle; this module submits
//! batches, polls a read-only status projection until it settles, and
//! applies the reviewed actions back against the backends.

pub mod client;
pub mod error;
pub mod job;
pub mod launch;
pub mod poller;
pub mod review;

pub use client::AutomationClient;
pub use error::AutomationError;
pub use job::{
    ActionLevel, EmailAction, GenericOperation, Job, JobStatus, Operation, OperationIcon,
    ProcessEmailsResponse,
};
pub use launch::{launch, LaunchOutcome, LaunchedJob, Selection};
pub use poller::{JobPoller, PollOutcome, PollSnapshot, PollerHandle, PollerState};
pub use review::{ActionReview, ApplyStatus, ApplySummary, ReviewAction};
