//! Shared HTTP plumbing for the REST clients.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;

/// Connect timeout applied to every client.
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds a reqwest client with explicit timeouts.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()
}

/// Error payload shape shared by both backends.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Extracts the status and backend-supplied `detail` from a failed
/// response, falling back to `API error: {status}`.
pub(crate) async fn error_detail(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => None,
    };
    (
        status,
        detail.unwrap_or_else(|| format!("API error: {}", status)),
    )
}
