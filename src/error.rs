use serde::Serialize;

/// Why a JSON document is not a usable check request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("invalid 'eventType' or 'type' label: {0}")]
    InvalidLabels(String),

    #[error("missing or invalid 'urls' list: {0}")]
    MissingUrls(String),
}

/// Failures that abort a run before any result is produced.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to fetch CRL list: {0}")]
    TargetList(String),

    #[error("Invalid CRL list: {0}")]
    InvalidTargetList(#[source] RequestError),

    #[error("Invalid event format. Must be JSON: {0}")]
    InvalidPayload(String),

    #[error("Missing or invalid 'urls' list in event: {0}")]
    MissingUrls(String),

    #[error("Missing New Relic API credentials.")]
    MissingCredentials,
}

/// A pushed payload that fails validation is an invalid event.
impl From<RequestError> for RunError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::MissingUrls(reason) => RunError::MissingUrls(reason),
            other => RunError::InvalidPayload(other.to_string()),
        }
    }
}

/// Failures while loading the process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The envelope returned instead of a result array when a run fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl From<&RunError> for ErrorEnvelope {
    fn from(err: &RunError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
