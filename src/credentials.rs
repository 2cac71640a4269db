//! Resolution of the secrets needed to report to New Relic.

use std::collections::HashMap;
use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::config::{Config, CredentialSource};

/// Looks up a named secret. Absence covers every failure: a resolver never errors.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Reads base64 encoded secrets from environment variables.
pub struct Base64EnvResolver {
    vars: Option<HashMap<String, String>>,
}

impl Base64EnvResolver {
    /// Resolves against the process environment.
    pub fn from_env() -> Self {
        Self { vars: None }
    }

    /// Resolves against a fixed set of variables.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self { vars: Some(vars) }
    }

    fn raw(&self, name: &str) -> Option<String> {
        match &self.vars {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }
}

impl CredentialResolver for Base64EnvResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        let encoded = self.raw(name)?;
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return None;
        }
        let bytes = STANDARD.decode(encoded).ok()?;
        let value = String::from_utf8(bytes).ok()?;
        (!value.is_empty()).then_some(value)
    }
}

/// Reads secrets from `<dir>/<name>`, the layout secret managers use when mounting into a
/// container.
pub struct SecretFileResolver {
    dir: PathBuf,
}

impl SecretFileResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CredentialResolver for SecretFileResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        // Names come from configuration; refuse anything that would leave the directory.
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return None;
        }
        let value = std::fs::read_to_string(self.dir.join(name)).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// The pair of secrets the reporter needs.
#[derive(Clone, PartialEq, Eq)]
pub struct NewRelicCredentials {
    pub account_id: String,
    pub api_key: String,
}

impl std::fmt::Debug for NewRelicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewRelicCredentials")
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewRelicCredentials {
    /// Resolves both secrets, or nothing if either is missing.
    pub fn resolve(
        resolver: &dyn CredentialResolver,
        api_key_name: &str,
        account_id_name: &str,
    ) -> Option<Self> {
        let api_key = resolver.resolve(api_key_name);
        let account_id = resolver.resolve(account_id_name);
        match (api_key, account_id) {
            (Some(api_key), Some(account_id)) => Some(Self {
                account_id,
                api_key,
            }),
            (api_key, account_id) => {
                tracing::warn!(
                    api_key_found = api_key.is_some(),
                    account_id_found = account_id.is_some(),
                    "Missing or invalid New Relic credentials"
                );
                None
            }
        }
    }
}

/// Builds the resolver selected in the configuration.
pub fn resolver_from_config(config: &Config) -> Box<dyn CredentialResolver> {
    match config.credentials.source {
        CredentialSource::EnvBase64 => Box::new(Base64EnvResolver::from_env()),
        CredentialSource::SecretFiles => {
            Box::new(SecretFileResolver::new(&config.credentials.secrets_dir))
        }
    }
}
