use serde::{Deserialize, Serialize};

use crate::error::{RequestError, RunError};

pub const DEFAULT_EVENT_TYPE: &str = "CDNCheck";
pub const DEFAULT_OBJECT_TYPE: &str = "crl";

/// A validated check request: the targets to probe and the labels to stamp on each result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    #[serde(rename = "eventType")]
    pub event_type: String,

    #[serde(rename = "type")]
    pub object_type: String,

    pub urls: Vec<String>,
}

/// Labels of a pushed payload or of the published target list.
#[derive(Debug, Deserialize)]
struct RawLabels {
    #[serde(rename = "eventType")]
    event_type: Option<String>,

    #[serde(rename = "type")]
    object_type: Option<String>,
}

/// Targets of a pushed payload or of the published target list.
#[derive(Debug, Deserialize)]
struct RawTargets {
    urls: Option<Vec<String>>,

    #[serde(rename = "URLs")]
    urls_upper: Option<Vec<String>>,
}

impl CheckRequest {
    /// Parses and validates a pushed payload.
    pub fn from_json(document: &str) -> Result<Self, RunError> {
        let value: serde_json::Value = serde_json::from_str(document)
            .map_err(|e| RunError::InvalidPayload(e.to_string()))?;
        Ok(Self::from_value(&value)?)
    }

    /// Validates a JSON document into a request.
    ///
    /// `urls` wins over `URLs` unless it is empty. Missing labels fall back to
    /// [`DEFAULT_EVENT_TYPE`] and [`DEFAULT_OBJECT_TYPE`]. An empty list is a valid
    /// request.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, RequestError> {
        if !value.is_object() {
            return Err(RequestError::NotAnObject);
        }
        let labels = RawLabels::deserialize(value)
            .map_err(|e| RequestError::InvalidLabels(e.to_string()))?;
        let targets = RawTargets::deserialize(value)
            .map_err(|e| RequestError::MissingUrls(e.to_string()))?;

        let urls = match (targets.urls, targets.urls_upper) {
            (Some(urls), Some(upper)) if urls.is_empty() => upper,
            (Some(urls), _) => urls,
            (None, Some(upper)) => upper,
            (None, None) => {
                return Err(RequestError::MissingUrls("no 'urls' field".to_string()));
            }
        };

        Ok(CheckRequest {
            event_type: labels
                .event_type
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            object_type: labels
                .object_type
                .unwrap_or_else(|| DEFAULT_OBJECT_TYPE.to_string()),
            urls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGICERT_ROOT: &str = "http://crl3.digicert.com/DigiCertGlobalRootCA.crl";

    #[test]
    fn test_defaults_apply_when_labels_are_missing() {
        let payload = serde_json::json!({ "urls": [DIGICERT_ROOT] }).to_string();

        let request = CheckRequest::from_json(&payload).expect("valid request");

        assert_eq!(request.event_type, "CDNCheck");
        assert_eq!(request.object_type, "crl");
        assert_eq!(request.urls, vec![DIGICERT_ROOT]);
    }

    #[test]
    fn test_labels_can_be_overridden() {
        let payload = r#"{"eventType": "CRLProbe", "type": "arl", "URLs": ["http://a/1.crl"]}"#;

        let request = CheckRequest::from_json(payload).expect("valid request");

        assert_eq!(request.event_type, "CRLProbe");
        assert_eq!(request.object_type, "arl");
        assert_eq!(request.urls, vec!["http://a/1.crl"]);
    }

    #[test]
    fn test_lowercase_urls_take_precedence() {
        let payload = r#"{"urls": ["http://a/1.crl"], "URLs": ["http://b/2.crl"]}"#;
        let request = CheckRequest::from_json(payload).expect("valid request");
        assert_eq!(request.urls, vec!["http://a/1.crl"]);

        let payload = r#"{"urls": [], "URLs": ["http://b/2.crl"]}"#;
        let request = CheckRequest::from_json(payload).expect("valid request");
        assert_eq!(request.urls, vec!["http://b/2.crl"]);
    }

    #[test]
    fn test_empty_list_is_valid() {
        let payload = r#"{"urls": []}"#;
        let request = CheckRequest::from_json(payload).expect("valid request");
        assert!(request.urls.is_empty());
    }

    #[test]
    fn test_missing_urls_is_rejected() {
        let payload = r#"{"eventType": "CDNCheck"}"#;

        let err = CheckRequest::from_json(payload).unwrap_err();

        assert!(matches!(err, RunError::MissingUrls(_)));
        let message = err.to_string();
        assert!(message.starts_with("Missing or invalid 'urls' list"));
    }

    #[test]
    fn test_non_list_urls_is_rejected() {
        let payload = r#"{"urls": "http://a/1.crl"}"#;
        let err = CheckRequest::from_json(payload).unwrap_err();
        assert!(matches!(err, RunError::MissingUrls(_)));

        let payload = r#"{"urls": [1, 2]}"#;
        let err = CheckRequest::from_json(payload).unwrap_err();
        assert!(matches!(err, RunError::MissingUrls(_)));
    }

    #[test]
    fn test_non_string_label_is_an_invalid_payload() {
        let payload = r#"{"eventType": 5, "urls": ["http://a/1.crl"]}"#;

        let err = CheckRequest::from_json(payload).unwrap_err();

        assert!(matches!(err, RunError::InvalidPayload(_)));
        assert!(err.to_string().contains("'eventType' or 'type' label"));
        assert!(!err.to_string().contains("'urls' list"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = CheckRequest::from_json("{urls: [").unwrap_err();
        assert!(matches!(err, RunError::InvalidPayload(_)));

        let payload = r#"["http://a/1.crl"]"#;
        let err = CheckRequest::from_json(payload).unwrap_err();
        assert!(matches!(err, RunError::InvalidPayload(_)));
    }

    #[test]
    fn test_document_errors_are_context_free() {
        let document = serde_json::json!(["http://a/1.crl"]);
        assert_eq!(
            CheckRequest::from_value(&document),
            Err(RequestError::NotAnObject)
        );

        let document = serde_json::json!({ "type": ["crl"], "urls": [] });
        let result = CheckRequest::from_value(&document);
        assert!(matches!(result, Err(RequestError::InvalidLabels(_))));
    }

    #[test]
    fn test_request_serialises_in_the_published_shape() {
        let request = CheckRequest {
            event_type: "CDNCheck".to_string(),
            object_type: "crl".to_string(),
            urls: vec![DIGICERT_ROOT.to_string()],
        };

        let expected = serde_json::json!({
            "eventType": "CDNCheck",
            "type": "crl",
            "urls": [DIGICERT_ROOT]
        });
        assert_eq!(serde_json::to_value(&request).expect("json"), expected);
    }
}
