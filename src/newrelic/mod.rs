use reqwest::Client;

use crate::credentials::NewRelicCredentials;
use crate::http_probe::prelude::CheckResult;

pub mod client;

pub use client::ReportError;

const ACCOUNT_ID_PLACEHOLDER: &str = "{account_id}";

/// Builds the events endpoint for an account from a template such as
/// `https://insights-collector.newrelic.com/v1/accounts/{account_id}/events`.
pub fn event_url(template: &str, account_id: &str) -> String {
    template.replace(ACCOUNT_ID_PLACEHOLDER, account_id)
}

/// Delivers finished batches to one New Relic account, at most once per batch.
pub struct NewRelicReporter {
    client: Client,
    event_url: String,
    api_key: String,
}

impl NewRelicReporter {
    pub fn new(
        client: Client,
        event_url_template: &str,
        credentials: NewRelicCredentials,
    ) -> Self {
        Self {
            client,
            event_url: event_url(event_url_template, &credentials.account_id),
            api_key: credentials.api_key,
        }
    }

    pub async fn report(&self, batch: &[CheckResult]) -> Result<usize, ReportError> {
        client::send_events(&self.client, &self.event_url, &self.api_key, batch)
            .await
    }

    /// Reports and logs the outcome; delivery failures never fail the run.
    pub async fn report_best_effort(&self, batch: &[CheckResult]) {
        match self.report(batch).await {
            Ok(sent) => tracing::info!(sent, "Sent results to New Relic."),
            Err(e) => tracing::error!(error = %e, "Failed to send data to New Relic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_url_substitutes_account() {
        assert_eq!(
            event_url(crate::config::probe_config::DEFAULT_EVENT_URL, "1234567"),
            "https://insights-collector.newrelic.com/v1/accounts/1234567/events"
        );
    }

    #[test]
    fn test_event_url_without_placeholder_is_kept() {
        let template = "http://collector.local/events";
        assert_eq!(event_url(template, "42"), template);
    }
}
