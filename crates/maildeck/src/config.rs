//! Environment-driven configuration for the backend endpoints.
//!
//! Both base URLs come from the environment so the same binary can point
//! at local or deployed backends. Everything has a working default for
//! the demo setup.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default mail REST API base URL.
pub const DEFAULT_MAIL_API_URL: &str = "http://localhost:8000/api";

/// Default automation service base URL.
pub const DEFAULT_AUTOMATION_API_URL: &str = "http://localhost:4000";

/// Default job status polling cadence in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the mail and automation clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the mail REST API.
    pub mail_api_url: String,
    /// Base URL of the automation service.
    pub automation_api_url: String,
    /// Cadence of job status polling.
    pub poll_interval: Duration,
    /// Request timeout for every backend call.
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mail_api_url: DEFAULT_MAIL_API_URL.to_string(),
            automation_api_url: DEFAULT_AUTOMATION_API_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `MAILDECK_API_URL` and `MAILDECK_AUTOMATION_URL` override the base
    /// URLs; `MAILDECK_POLL_INTERVAL_SECS` and
    /// `MAILDECK_HTTP_TIMEOUT_SECS` override the timings.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mail_api_url = base_url_var("MAILDECK_API_URL", DEFAULT_MAIL_API_URL)?;
        let automation_api_url =
            base_url_var("MAILDECK_AUTOMATION_URL", DEFAULT_AUTOMATION_API_URL)?;
        let poll_interval =
            secs_var("MAILDECK_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let http_timeout = secs_var("MAILDECK_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        Ok(Self {
            mail_api_url,
            automation_api_url,
            poll_interval: Duration::from_secs(poll_interval),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}

/// Reads a base URL variable, trimming any trailing slash.
fn base_url_var(name: &str, default: &str) -> Result<String, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let url = raw.trim().trim_end_matches('/').to_string();
    if url.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: "base URL must not be empty".to_string(),
        });
    }
    Ok(url)
}

/// Reads a non-zero duration variable expressed in seconds.
fn secs_var(name: &str, default: u64) -> Result<u64, ConfigError> {
    let secs = match env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("'{}' is not a valid number of seconds", raw),
        })?,
        Err(_) => default,
    };
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            "MAILDECK_API_URL",
            "MAILDECK_AUTOMATION_URL",
            "MAILDECK_POLL_INTERVAL_SECS",
            "MAILDECK_HTTP_TIMEOUT_SECS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mail_api_url, "http://localhost:8000/api");
        assert_eq!(config.poll_interval, Duration::from_secs(3));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("MAILDECK_API_URL", "https://mail.example.com/api/");
        env::set_var("MAILDECK_POLL_INTERVAL_SECS", "10");
        let config = Config::from_env().unwrap();
        // Trailing slash is trimmed so path joining stays predictable.
        assert_eq!(config.mail_api_url, "https://mail.example.com/api");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_interval_rejected() {
        clear_env();
        env::set_var("MAILDECK_POLL_INTERVAL_SECS", "soon");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("MAILDECK_POLL_INTERVAL_SECS"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_interval_rejected() {
        clear_env();
        env::set_var("MAILDECK_POLL_INTERVAL_SECS", "0");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_url_rejected() {
        clear_env();
        env::set_var("MAILDECK_API_URL", "  ");
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
