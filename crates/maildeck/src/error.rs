use thiserror::Error;

use crate::automation::AutomationError;
use crate::email::MailApiError;

#[derive(Error, Debug)]
pub enum MaildeckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail API error: {0}")]
    Mail(#[from] MailApiError),

    #[error("Automation error: {0}")]
    Automation(#[from] AutomationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MaildeckError>;
