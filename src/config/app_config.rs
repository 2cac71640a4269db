use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;

use super::probe_config::Config;
use crate::error::ConfigError;

const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Load the application configuration from a YAML file and environment variables.
/// The file is named by `CONFIG_FILE`; without it, `config.yml` is used when present
/// and the built-in defaults otherwise. A `.env` file is honoured.
pub fn load_config() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();
    let vars: HashMap<String, String> = env::vars().collect();
    load_config_with(&vars)
}

/// Same as [`load_config`], reading variables from `vars` instead of the process
/// environment so tests do not leak into each other.
pub fn load_config_with(vars: &HashMap<String, String>) -> Result<Config, ConfigError> {
    let mut config = match vars.get("CONFIG_FILE") {
        Some(path) => read_config_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => read_config_file(DEFAULT_CONFIG_FILE)?,
        None => Config::default(),
    };

    if let Some(url) = vars.get("CRL_TARGET_LIST_URL") {
        config.targets.source_url = url.clone();
    }
    if let Some(url) = vars.get("NEW_RELIC_EVENT_URL") {
        config.reporting.event_url = url.clone();
    }
    if let Some(secs) = parse_seconds(vars, "CRL_MAX_EXECUTION_SECS")? {
        config.probe.max_execution_seconds = secs;
    }
    if let Some(secs) = parse_seconds(vars, "CRL_PROBE_TIMEOUT_SECS")? {
        config.probe.timeout_seconds = secs;
    }

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn read_config_file(path: &str) -> Result<Config, ConfigError> {
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&config_str).map_err(|source| ConfigError::Yaml {
        path: path.to_string(),
        source,
    })
}

fn parse_seconds(vars: &HashMap<String, String>, name: &str) -> Result<Option<u64>, ConfigError> {
    let Some(value) = vars.get(name) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) => Ok(Some(secs)),
        Err(_) => Err(ConfigError::InvalidEnv {
            name: name.to_string(),
            value: value.clone(),
        }),
    }
}

/// Setup a client for the auxiliary calls (target list, event report).
pub fn setup_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("crlcheck/", env!("CARGO_PKG_VERSION")))
        .build()
}
