//! Maildeck: client library for a demo webmail system.
//!
//! Talks to two external backends: a mail REST API for email CRUD and a
//! separate automation service that processes email batches as
//! server-side jobs. The library covers the mail data client, the
//! automation launch flow, the job status poller and the
//! post-completion action review; `maildeck-cli` is the user-facing
//! shell on top.

pub mod automation;
pub mod config;
pub mod email;
pub mod error;
mod http;
pub mod timestamp;

pub use automation::{
    launch, ActionLevel, ActionReview, ApplySummary, AutomationClient, AutomationError, Job,
    JobPoller, JobStatus, LaunchOutcome, LaunchedJob, Operation, PollOutcome, PollSnapshot,
    PollerHandle, PollerState, Selection,
};
pub use config::Config;
pub use email::{Email, EmailDraft, EmailPatch, Folder, MailApiError, MailClient};
pub use error::{ConfigError, MaildeckError, Result};
