use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_TARGET_LIST_URL: &str =
    "https://raw.githubusercontent.com/aluusre/CRLproject/main/CRLURLs.json";
pub const DEFAULT_EVENT_URL: &str =
    "https://insights-collector.newrelic.com/v1/accounts/{account_id}/events";

/// Settings file for crlcheck. Every section and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub targets: TargetSourceConfig,
    pub probe: ProbeConfig,
    pub reporting: ReportingConfig,
    pub credentials: CredentialsConfig,
}

/// Where the pull mode finds its target list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetSourceConfig {
    /// URL of a JSON document of the form `{"urls": [...]}`.
    pub source_url: String,

    pub fetch_timeout_seconds: u64,
}

impl Default for TargetSourceConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_TARGET_LIST_URL.to_string(),
            fetch_timeout_seconds: 10,
        }
    }
}

/// Bounds on individual probes and on the whole batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Timeout of a single GET.
    pub timeout_seconds: u64,

    /// Budget of a whole batch. Once spent, remaining targets are skipped.
    pub max_execution_seconds: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            max_execution_seconds: 180,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.max_execution_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Event API endpoint. `{account_id}` is replaced with the resolved account.
    pub event_url: String,

    pub timeout_seconds: u64,

    /// When set, a run without credentials fails instead of skipping the report.
    pub require_credentials: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            event_url: DEFAULT_EVENT_URL.to_string(),
            timeout_seconds: 10,
            require_credentials: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// Base64 encoded values in environment variables.
    EnvBase64,
    /// One file per secret in a directory, as mounted by a secret manager.
    SecretFiles,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub source: CredentialSource,
    pub secrets_dir: String,
    pub api_key_name: String,
    pub account_id_name: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            source: CredentialSource::EnvBase64,
            secrets_dir: "/run/secrets".to_string(),
            api_key_name: "RELIC_API_KEY_ENC".to_string(),
            account_id_name: "RELIC_ACCOUNT_ID_ENC".to_string(),
        }
    }
}
