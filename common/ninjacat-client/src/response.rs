//! Response classification shared by every endpoint
//!
//! The service reports failures in the body rather than reliably through the
//! status code, so each response is read in full, decoded as one JSON value and
//! inspected for an error field before being typed.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NinjacatError, Result};

/// Body field carrying management API failures
pub(crate) const API_ERROR_FIELD: &str = "error";
/// Body field carrying report service failures
pub(crate) const REPORT_ERROR_FIELD: &str = "error_message";

/// Statuses the service treats as a usable response
pub(crate) fn is_success(status: StatusCode) -> bool {
    (200..=301).contains(&status.as_u16())
}

/// A fully buffered response
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub async fn read(response: Response) -> Result<Self> {
        let status = response.status();
        let body = response.text().await?;
        Ok(Self { status, body })
    }

    /// Decode the body as a single JSON value, checking `error_field` first
    ///
    /// An empty body decodes as `null`. A non-success status with an empty or
    /// undecodable body becomes [`NinjacatError::HttpStatus`]; a body carrying
    /// the error field fails with its message whatever the status was. Any
    /// other parseable body is returned as is, whatever the status was.
    pub fn into_value(self, error_field: &str) -> Result<Value> {
        let ok = is_success(self.status);
        let trimmed = self.body.trim();

        if trimmed.is_empty() {
            if ok {
                return Ok(Value::Null);
            }
            return Err(self.status_error());
        }

        let value: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) if !ok => return Err(self.status_error()),
            Err(err) => return Err(err.into()),
        };

        if let Some(message) = error_message(&value, error_field) {
            return Err(if error_field == REPORT_ERROR_FIELD {
                NinjacatError::Report(message)
            } else {
                NinjacatError::Api(message)
            });
        }

        Ok(value)
    }

    pub fn decode<T: DeserializeOwned>(self, error_field: &str) -> Result<T> {
        let value = self.into_value(error_field)?;
        Ok(serde_json::from_value(value)?)
    }

    fn status_error(&self) -> NinjacatError {
        let body = self.body.trim();
        NinjacatError::HttpStatus {
            status: self.status.as_u16(),
            body: (!body.is_empty()).then(|| body.to_string()),
        }
    }
}

/// Message of a non-null error field on an object body
pub(crate) fn error_message(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success_range() {
        assert!(is_success(StatusCode::OK));
        assert!(is_success(StatusCode::CREATED));
        assert!(is_success(StatusCode::MOVED_PERMANENTLY));
        assert!(!is_success(StatusCode::FOUND));
        assert!(!is_success(StatusCode::BAD_REQUEST));
        assert!(!is_success(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_empty_success_body_is_null() {
        let value = raw(200, "").into_value(API_ERROR_FIELD).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_empty_failure_body_is_status_error() {
        let err = raw(502, "  ").into_value(API_ERROR_FIELD).unwrap_err();
        assert!(matches!(
            err,
            NinjacatError::HttpStatus {
                status: 502,
                body: None
            }
        ));
    }

    #[test]
    fn test_unparseable_failure_body_keeps_text() {
        let err = raw(503, "<html>down</html>")
            .into_value(API_ERROR_FIELD)
            .unwrap_err();
        match err {
            NinjacatError::HttpStatus { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body.as_deref(), Some("<html>down</html>"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_success_body_is_decode_error() {
        let err = raw(200, "not json").into_value(API_ERROR_FIELD).unwrap_err();
        assert!(matches!(err, NinjacatError::Decode(_)));
    }

    #[test]
    fn test_error_field_wins_over_status() {
        let err = raw(200, r#"{"error_message": "template missing"}"#)
            .into_value(REPORT_ERROR_FIELD)
            .unwrap_err();
        assert!(matches!(err, NinjacatError::Report(ref m) if m == "template missing"));

        let err = raw(400, r#"{"error": "bad token"}"#)
            .into_value(API_ERROR_FIELD)
            .unwrap_err();
        assert!(matches!(err, NinjacatError::Api(ref m) if m == "bad token"));
    }

    #[test]
    fn test_null_error_field_is_ignored() {
        let value = raw(200, r#"{"error": null, "ok": true}"#)
            .into_value(API_ERROR_FIELD)
            .unwrap();
        assert_eq!(value, json!({"error": null, "ok": true}));
    }

    #[test]
    fn test_structured_failure_body_without_error_field() {
        let value = raw(404, r#"{"status": 0, "id": 5}"#)
            .into_value(REPORT_ERROR_FIELD)
            .unwrap();
        assert_eq!(value, json!({"status": 0, "id": 5}));
    }

    #[test]
    fn test_error_message_renders_non_strings() {
        assert_eq!(
            error_message(&json!({"error": {"code": 7}}), "error").as_deref(),
            Some(r#"{"code":7}"#)
        );
        assert_eq!(error_message(&json!([1, 2]), "error"), None);
    }
}
