use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Reasons a single probe did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// DNS failure, refused connection, timeout or an unusable URL.
    #[error("{0}")]
    Transport(String),

    /// The endpoint answered with a 4xx or 5xx status.
    #[error("{status} for url: {url}")]
    Status { status: StatusCode, url: String },
}

/// Raw outcome of a probe, before it is stamped with the batch labels.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub elapsed: Duration,
    pub result: Result<StatusCode, ProbeError>,
}

/// One record of a batch, serialised as a New Relic custom event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(rename = "eventType")]
    pub event_type: String,

    #[serde(rename = "type")]
    pub object_type: String,

    pub url: String,

    /// Whole seconds spent on this probe only.
    pub duration: u64,

    pub success: bool,

    /// Empty when `success` is true.
    pub error: String,
}

impl CheckResult {
    pub fn from_outcome(
        event_type: &str,
        object_type: &str,
        url: &str,
        outcome: ProbeOutcome,
    ) -> Self {
        let (success, error) = match outcome.result {
            Ok(_) => (true, String::new()),
            Err(e) => (false, e.to_string()),
        };

        CheckResult {
            event_type: event_type.to_string(),
            object_type: object_type.to_string(),
            url: url.to_string(),
            duration: outcome.elapsed.as_secs(),
            success,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_outcome_has_empty_error() {
        let outcome = ProbeOutcome {
            elapsed: Duration::from_millis(2_900),
            result: Ok(StatusCode::OK),
        };
        let url = "http://crl.example.com/a.crl";
        let result = CheckResult::from_outcome("CDNCheck", "crl", url, outcome);

        assert!(result.success);
        assert_eq!(result.error, "");
        assert_eq!(result.duration, 2);
        assert_eq!(result.url, url);
    }

    #[test]
    fn test_status_failure_is_described() {
        let url = "http://crl.example.com/missing.crl";
        let outcome = ProbeOutcome {
            elapsed: Duration::from_millis(10),
            result: Err(ProbeError::Status {
                status: StatusCode::NOT_FOUND,
                url: url.to_string(),
            }),
        };
        let result = CheckResult::from_outcome("CDNCheck", "crl", url, outcome);

        assert!(!result.success);
        assert_eq!(result.duration, 0);
        assert_eq!(
            result.error,
            "404 Not Found for url: http://crl.example.com/missing.crl"
        );
    }

    #[test]
    fn test_serialised_field_names() {
        let result = CheckResult {
            event_type: "CDNCheck".to_string(),
            object_type: "crl".to_string(),
            url: "http://crl3.digicert.com/DigiCertGlobalRootCA.crl".to_string(),
            duration: 1,
            success: true,
            error: String::new(),
        };

        let value = serde_json::to_value(&result).expect("serialisable");
        assert_eq!(
            value,
            serde_json::json!({
                "eventType": "CDNCheck",
                "type": "crl",
                "url": "http://crl3.digicert.com/DigiCertGlobalRootCA.crl",
                "duration": 1,
                "success": true,
                "error": ""
            })
        );
    }
}
