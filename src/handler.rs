//! The pull and push entry points. Both share request validation, the credential
//! policy and the output envelope.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::batch::BatchRunner;
use crate::config::{Config, setup_http_client};
use crate::credentials::{CredentialResolver, NewRelicCredentials, resolver_from_config};
use crate::error::{ConfigError, ErrorEnvelope, RunError};
use crate::http_probe::prelude::*;
use crate::newrelic::NewRelicReporter;
use crate::request::CheckRequest;
use crate::target_source::{fetch_targets, parse_payload};

/// What a run hands back: the batch, or the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RunOutput {
    Results(Vec<CheckResult>),
    Error(ErrorEnvelope),
}

impl RunOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, RunOutput::Error(_))
    }
}

impl From<Result<Vec<CheckResult>, RunError>> for RunOutput {
    fn from(result: Result<Vec<CheckResult>, RunError>) -> Self {
        match result {
            Ok(batch) => RunOutput::Results(batch),
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                RunOutput::Error(ErrorEnvelope::from(&e))
            }
        }
    }
}

pub struct Checker<P> {
    config: Config,
    runner: BatchRunner<P>,
    resolver: Box<dyn CredentialResolver>,
    fetch_client: Client,
    report_client: Client,
}

impl Checker<HttpProber> {
    /// Wires the HTTP prober, the configured credential resolver and the auxiliary clients.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let prober = HttpProber::with_timeout(config.probe.timeout())?;
        let resolver = resolver_from_config(&config);
        Self::with_parts(config, prober, resolver)
    }
}

impl<P: Prober> Checker<P> {
    pub fn with_parts(
        config: Config,
        prober: P,
        resolver: Box<dyn CredentialResolver>,
    ) -> Result<Self, ConfigError> {
        let fetch_timeout = Duration::from_secs(config.targets.fetch_timeout_seconds);
        let report_timeout = Duration::from_secs(config.reporting.timeout_seconds);
        let fetch_client = setup_http_client(fetch_timeout)?;
        let report_client = setup_http_client(report_timeout)?;
        Ok(Self {
            runner: BatchRunner::new(prober, config.probe.budget()),
            config,
            resolver,
            fetch_client,
            report_client,
        })
    }

    /// Checks the targets of the published list.
    pub async fn run_pull(&self) -> RunOutput {
        let source_url = &self.config.targets.source_url;
        let request = fetch_targets(&self.fetch_client, source_url).await;
        self.execute(request).await.into()
    }

    /// Checks the targets of a pushed JSON payload.
    pub async fn run_push(&self, payload: &str) -> RunOutput {
        self.execute(parse_payload(payload)).await.into()
    }

    async fn execute(
        &self,
        request: Result<CheckRequest, RunError>,
    ) -> Result<Vec<CheckResult>, RunError> {
        let request = request?;

        let credentials = NewRelicCredentials::resolve(
            self.resolver.as_ref(),
            &self.config.credentials.api_key_name,
            &self.config.credentials.account_id_name,
        );
        if credentials.is_none() {
            if self.config.reporting.require_credentials {
                return Err(RunError::MissingCredentials);
            }
            tracing::warn!("Reporting disabled for this run");
        }

        tracing::info!(
            targets = request.urls.len(),
            budget_secs = self.runner.budget().as_secs(),
            event_type = %request.event_type,
            "Starting CRL checks"
        );
        let batch = self.runner.run(&request).await;

        if let Some(credentials) = credentials {
            let reporter = NewRelicReporter::new(
                self.report_client.clone(),
                &self.config.reporting.event_url,
                credentials,
            );
            reporter.report_best_effort(&batch).await;
        }

        let failed = batch.iter().filter(|r| !r.success).count();
        tracing::info!(checked = batch.len(), failed, "CRL checks finished");
        Ok(batch)
    }
}
