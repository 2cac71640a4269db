use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};

use crate::http_probe::prelude::CheckResult;
use crate::http_probe::report;

const API_KEY_HEADER: &str = "Api-Key";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("invalid API key header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to reach New Relic: {0}")]
    Transport(String),

    #[error("New Relic rejected the events: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Sends a batch of check results to the New Relic event API as one JSON array.
///
/// # Arguments
///
/// * `client` - The HTTP client; its timeout bounds the call.
/// * `event_url` - The fully resolved events endpoint of the account.
/// * `api_key` - An insert key, sent in the `Api-Key` header.
/// * `events` - The batch to send. An empty batch is not sent.
///
/// Returns the number of events delivered.
pub async fn send_events(
    client: &Client,
    event_url: &str,
    api_key: &str,
    events: &[CheckResult],
) -> Result<usize, ReportError> {
    if events.is_empty() {
        tracing::warn!("No events to send.");
        return Ok(0);
    }

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let mut key = HeaderValue::from_str(api_key)?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);

    let response = client
        .post(event_url)
        .headers(headers)
        .json(events)
        .send()
        .await
        .map_err(|e| ReportError::Transport(report(&e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ReportError::Status { status, body });
    }
    Ok(events.len())
}
