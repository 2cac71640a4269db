use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use super::prelude::*;
use super::report;

/// Something that can check a single target and always come back with an outcome.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// Probes targets with a plain HTTP GET, downloading the body the way a CRL consumer would.
#[derive(Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Wraps a client whose timeout bounds each probe.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("crlcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();
        let result = probe_url(&self.client, url).await;
        ProbeOutcome {
            elapsed: start.elapsed(),
            result,
        }
    }
}

async fn probe_url(client: &Client, url: &str) -> Result<reqwest::StatusCode, ProbeError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProbeError::Transport(report(&e)))?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(ProbeError::Status {
            status,
            url: url.to_string(),
        });
    }

    // The transfer is part of the check: a CRL that cannot be fully downloaded is unusable.
    let body = response
        .bytes()
        .await
        .map_err(|e| ProbeError::Transport(report(&e)))?;
    tracing::debug!(
        url,
        status = status.as_u16(),
        bytes = body.len(),
        "Target checked"
    );

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn http_prober() -> HttpProber {
        let timeout = Duration::from_secs(2);
        HttpProber::with_timeout(timeout).expect("client")
    }

    fn unused_local_url() -> String {
        // Bind then drop, so nothing listens on the port afterwards.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        format!("http://127.0.0.1:{port}/root.crl")
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_transport_failure() {
        let prober = http_prober();
        let url = unused_local_url();

        let outcome = prober.probe(&url).await;

        match outcome.result {
            Err(ProbeError::Transport(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_url_is_a_transport_failure() {
        let prober = http_prober();

        let outcome = prober.probe("not a url").await;
        let result = CheckResult::from_outcome("CDNCheck", "crl", "not a url", outcome);

        assert!(!result.success);
        assert!(!result.error.is_empty());
        assert_eq!(result.duration, 0);
    }
}
