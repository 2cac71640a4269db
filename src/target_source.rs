//! Where a run gets its targets from: a published list (pull) or the triggering payload (push).

use reqwest::Client;
use url::Url;

use crate::error::RunError;
use crate::http_probe::report;
use crate::request::CheckRequest;

/// Fetches the published target list. Any failure to get a usable list is fatal for the run.
pub async fn fetch_targets(client: &Client, source_url: &str) -> Result<CheckRequest, RunError> {
    let invalid = |e: url::ParseError| RunError::TargetList(format!("{source_url}: {e}"));
    let url = Url::parse(source_url).map_err(invalid)?;
    tracing::info!(%url, "Fetching CRL URLs");

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| RunError::TargetList(report(&e)))?;
    tracing::info!(status = response.status().as_u16(), "Target list fetched");

    let document: serde_json::Value = response
        .json()
        .await
        .map_err(|e| RunError::TargetList(report(&e)))?;
    let request = CheckRequest::from_value(&document)
        .map_err(RunError::InvalidTargetList)?;
    tracing::info!(targets = request.urls.len(), "Fetched CRL URLs");
    Ok(request)
}

/// Validates a pushed payload.
pub fn parse_payload(payload: &str) -> Result<CheckRequest, RunError> {
    CheckRequest::from_json(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_source_url_is_fatal() {
        let client = Client::new();

        let err = fetch_targets(&client, "not a url").await.unwrap_err();

        assert!(matches!(err, RunError::TargetList(_)));
        assert!(err.to_string().starts_with("Failed to fetch CRL list"));
    }

    #[test]
    fn test_payload_is_validated() {
        let payload = r#"{"urls": ["http://crl3.digicert.com/DigiCertGlobalRootCA.crl"]}"#;
        let request = parse_payload(payload).expect("valid payload");
        assert_eq!(request.urls.len(), 1);

        assert!(matches!(parse_payload("{}"), Err(RunError::MissingUrls(_))));
    }
}
