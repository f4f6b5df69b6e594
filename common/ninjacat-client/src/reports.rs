//! Report start and poll operations
//!
//! Report calls go to the report host and authenticate with a per-call signed
//! token rather than the OAuth2 session. Polling cadence belongs to the caller:
//! `get_report` performs exactly one request.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{NinjacatClient, join_url};
use crate::error::{NinjacatError, Result};
use crate::ids::{AgencyId, ReportId, RequestId, ResourceId};
use crate::lenient;
use crate::response::REPORT_ERROR_FIELD;
use crate::signing::{self, ReportPollClaims, ReportStartClaims};

const REPORT_PATH: &str = "open_api/report";

/// Optional date window for a report run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ReportRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Handle returned when a report run is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReportRequest {
    pub request_id: RequestId,
}

/// One row of report data, keyed by metric or dimension name
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRows {
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub totals: Vec<Row>,
    #[serde(default, rename = "dataSampled")]
    pub data_sampled: bool,
}

/// Failure detail for a single widget of a report
///
/// Decoded leniently: a field of an unexpected type is left empty rather than
/// failing the poll that carries it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetError {
    #[serde(rename = "type", deserialize_with = "lenient::option")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::option")]
    pub msg: Option<String>,
    #[serde(deserialize_with = "lenient::option")]
    pub dev_msg: Option<String>,
    #[serde(deserialize_with = "lenient::option")]
    pub user_msg: Option<String>,
    /// Kept as sent; the service uses strings and objects here
    pub error: Option<Value>,
    #[serde(deserialize_with = "lenient::list")]
    pub info: Vec<Value>,
    pub widget_archive_id: Option<Value>,
    pub widget_id: Option<Value>,
    #[serde(deserialize_with = "lenient::list")]
    pub exception_messages: Vec<Value>,
}

impl WidgetError {
    /// Best human-readable description of the failure
    pub fn message(&self) -> Option<String> {
        self.user_msg
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| match &self.error {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            })
    }
}

/// Widget errors keyed by widget; entries that are not objects become empty
fn widget_errors<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, WidgetError>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries: BTreeMap<String, Value> = lenient::or_default(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|(key, value)| (key, serde_json::from_value(value).unwrap_or_default()))
        .collect())
}

/// A generated report within a ready response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReportId>,
    pub title: String,
    #[serde(rename = "dataRows")]
    pub data_rows: DataRows,
    #[serde(default, deserialize_with = "widget_errors")]
    pub errors: BTreeMap<String, WidgetError>,
}

/// Lifecycle of a report run as seen by one poll
///
/// Error bodies never become a variant: they are returned as
/// [`NinjacatError::Report`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReportStatus {
    Pending { id: ReportId },
    Running { id: ReportId },
    Ready { id: ReportId, data: Vec<Report> },
}

impl ReportStatus {
    pub const PENDING: i64 = 0;
    pub const RUNNING: i64 = 1;
    pub const READY: i64 = 2;

    pub fn id(&self) -> ReportId {
        match self {
            ReportStatus::Pending { id }
            | ReportStatus::Running { id }
            | ReportStatus::Ready { id, .. } => *id,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ReportStatus::Ready { .. })
    }

    /// Classify a decoded poll body
    ///
    /// `error_message` takes precedence over `status`.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(message) = crate::response::error_message(&value, REPORT_ERROR_FIELD) {
            return Err(NinjacatError::Report(message));
        }

        let envelope: StatusEnvelope = serde_json::from_value(value)?;
        match envelope.status {
            Self::PENDING => Ok(ReportStatus::Pending { id: envelope.id }),
            Self::RUNNING => Ok(ReportStatus::Running { id: envelope.id }),
            Self::READY => Ok(ReportStatus::Ready {
                id: envelope.id,
                data: envelope.data.unwrap_or_default(),
            }),
            other => Err(NinjacatError::UnknownReportStatus(other)),
        }
    }
}

#[derive(Deserialize)]
struct StatusEnvelope {
    status: i64,
    id: ReportId,
    /// Missing and null both mean no data
    #[serde(default)]
    data: Option<Vec<Report>>,
}

/// Path for starting a report run
pub(crate) fn start_path(
    agency_id: AgencyId,
    template_id: &ResourceId,
    advertiser_id: &ResourceId,
) -> String {
    format!("{REPORT_PATH}/{agency_id}/{template_id}/{advertiser_id}")
}

/// Path for polling a report run
pub(crate) fn poll_path(agency_id: AgencyId, request_id: RequestId) -> String {
    format!("{REPORT_PATH}/{agency_id}/{request_id}")
}

impl NinjacatClient {
    /// Ask the report service to generate `template_id` for `advertiser_id`
    ///
    /// The date window is sent as a form body only when at least one bound is
    /// set. Returns the request id to poll with [`get_report`](Self::get_report).
    pub async fn request_report(
        &self,
        template_id: impl Into<ResourceId>,
        advertiser_id: impl Into<ResourceId>,
        range: Option<&ReportRange>,
    ) -> Result<ReportRequest> {
        let template_id = template_id.into();
        let advertiser_id = advertiser_id.into();
        let agency_id = self.credentials.agency_id;

        let claims = ReportStartClaims::new(agency_id, template_id.clone(), advertiser_id.clone());
        let token = signing::sign(&claims, &self.credentials.report_secret)?;

        let url = join_url(
            &self.report_base_url,
            &start_path(agency_id, &template_id, &advertiser_id),
        );
        debug!(%url, "POST report");

        let mut request = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(range) = range.filter(|range| !range.is_empty()) {
            request = request.form(range);
        }

        self.send(request).await?.decode(REPORT_ERROR_FIELD)
    }

    /// Poll a report run once
    pub async fn get_report(&self, request_id: RequestId) -> Result<ReportStatus> {
        let agency_id = self.credentials.agency_id;
        let claims = ReportPollClaims::new(agency_id, request_id);
        let token = signing::sign(&claims, &self.credentials.report_secret)?;

        let url = join_url(&self.report_base_url, &poll_path(agency_id, request_id));
        debug!(%url, "GET report");

        let request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"));

        let value = self.send(request).await?.into_value(REPORT_ERROR_FIELD)?;
        ReportStatus::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(
            start_path(7, &ResourceId::from("T1"), &ResourceId::from(44u64)),
            "open_api/report/7/T1/44"
        );
        assert_eq!(poll_path(7, 901), "open_api/report/7/901");
    }

    #[test]
    fn test_pending_and_running() {
        assert_eq!(
            ReportStatus::from_value(json!({"status": 0, "id": 3})).unwrap(),
            ReportStatus::Pending { id: 3 }
        );
        assert_eq!(
            ReportStatus::from_value(json!({"status": 1, "id": 3})).unwrap(),
            ReportStatus::Running { id: 3 }
        );
    }

    #[test]
    fn test_ready_carries_reports() {
        let status = ReportStatus::from_value(json!({
            "status": 2,
            "id": 3,
            "data": [{
                "success": true,
                "id": 3,
                "title": "Paid Search",
                "dataRows": {
                    "rows": [{"clicks": 10, "dimensions": {"date": "2021-01-01"}}],
                    "totals": [{"clicks": 10}],
                    "dataSampled": false
                },
                "errors": {
                    "w1": {"type": "warning", "msg": "partial", "widgetId": 9, "info": []}
                }
            }]
        }))
        .unwrap();

        let ReportStatus::Ready { id, data } = status else {
            panic!("expected ready report");
        };
        assert_eq!(id, 3);
        assert_eq!(data.len(), 1);
        let report = &data[0];
        assert!(report.success);
        assert_eq!(report.title, "Paid Search");
        assert_eq!(report.data_rows.rows[0]["clicks"], json!(10));
        assert_eq!(report.data_rows.totals.len(), 1);
        assert!(!report.data_rows.data_sampled);
        let widget = &report.errors["w1"];
        assert_eq!(widget.kind.as_deref(), Some("warning"));
        assert_eq!(widget.msg.as_deref(), Some("partial"));
        assert_eq!(widget.widget_id, Some(json!(9)));
    }

    #[test]
    fn test_ready_with_null_data() {
        let status =
            ReportStatus::from_value(json!({"status": 2, "id": 3, "data": null})).unwrap();
        assert_eq!(
            status,
            ReportStatus::Ready {
                id: 3,
                data: vec![]
            }
        );
    }

    #[test]
    fn test_malformed_widget_errors_do_not_fail_the_poll() {
        let status = ReportStatus::from_value(json!({
            "status": 2,
            "id": 3,
            "data": [{
                "success": false,
                "title": "Social",
                "dataRows": {"rows": [], "totals": [], "dataSampled": false},
                "errors": {
                    "w1": {"error": {"code": 500}, "widgetId": "w-1", "msg": 12, "info": null},
                    "w2": "timeout"
                }
            }]
        }))
        .unwrap();

        let ReportStatus::Ready { data, .. } = status else {
            panic!("expected ready report");
        };
        let errors = &data[0].errors;
        assert_eq!(errors["w1"].error, Some(json!({"code": 500})));
        assert_eq!(errors["w1"].widget_id, Some(json!("w-1")));
        assert_eq!(errors["w1"].msg, None);
        assert!(errors["w1"].info.is_empty());
        assert_eq!(errors["w1"].message().as_deref(), Some(r#"{"code":500}"#));
        assert_eq!(errors["w2"], WidgetError::default());
    }

    #[test]
    fn test_errors_sent_as_empty_list() {
        let report: Report = serde_json::from_value(json!({
            "success": true,
            "title": "Search",
            "dataRows": {"rows": [], "totals": [], "dataSampled": false},
            "errors": []
        }))
        .unwrap();
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_error_message_beats_status() {
        let err = ReportStatus::from_value(json!({
            "status": 2,
            "id": 3,
            "error_message": "x"
        }))
        .unwrap_err();
        assert!(matches!(err, NinjacatError::Report(ref m) if m == "x"));
    }

    #[test]
    fn test_unknown_status() {
        let err = ReportStatus::from_value(json!({"status": 5, "id": 3})).unwrap_err();
        assert!(matches!(err, NinjacatError::UnknownReportStatus(5)));
    }

    #[test]
    fn test_shape_without_status_is_decode_error() {
        let err = ReportStatus::from_value(json!({"id": 3})).unwrap_err();
        assert!(matches!(err, NinjacatError::Decode(_)));
    }

    #[test]
    fn test_status_accessors() {
        let ready = ReportStatus::Ready {
            id: 8,
            data: vec![],
        };
        assert!(ready.is_ready());
        assert_eq!(ready.id(), 8);
        assert!(!ReportStatus::Pending { id: 1 }.is_ready());
    }

    #[test]
    fn test_range_form_encoding() {
        let range = ReportRange::new(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
        );
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(
            json,
            json!({"start_date": "2021-01-01", "end_date": "2021-01-31"})
        );
        assert!(ReportRange::default().is_empty());
        assert!(!range.is_empty());
    }
}
