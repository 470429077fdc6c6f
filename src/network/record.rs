use crate::capture::{duration_millis, format_bytes, FieldMap};
use crate::network::body::Body;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};
use url::Url;

/// Opaque token linking a request start to its completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub(crate) fn new(id: String) -> Self {
        Self(id)
    }

    /// Returned by `begin_request` while recording is disabled. Completing it
    /// is always a no-op.
    pub fn disabled() -> Self {
        Self(String::new())
    }

    pub fn is_disabled(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One HTTP-like call, pending until a status or an error arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub id: CorrelationId,
    pub method: String,
    pub url: String,
    pub request_headers: Option<FieldMap>,
    pub request_body: Body,
    pub status: Option<u16>,
    pub response_body: Body,
    pub response_headers: Option<FieldMap>,
    pub started_at: DateTime<Local>,
    pub completed_at: Option<DateTime<Local>>,
    #[serde(rename = "duration_ms", with = "duration_millis::option")]
    pub duration: Option<Duration>,
    pub error: Option<String>,
    pub request_size: Option<u64>,
    pub response_size: Option<u64>,
}

impl NetworkRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_none() && self.error.is_none()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some() || matches!(self.status, Some(code) if code >= 400)
    }

    /// "ERROR", "PENDING" or the numeric status code.
    pub fn status_text(&self) -> String {
        match (self.error.as_ref(), self.status) {
            (Some(_), _) => "ERROR".to_string(),
            (None, Some(code)) => code.to_string(),
            (None, None) => "PENDING".to_string(),
        }
    }

    fn parsed_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }

    /// URL path, or the raw URL when it cannot be parsed.
    pub fn path(&self) -> String {
        self.parsed_url()
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| self.url.clone())
    }

    pub fn host(&self) -> String {
        self.parsed_url()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn query(&self) -> Option<String> {
        self.parsed_url()
            .and_then(|url| url.query().map(str::to_string))
    }

    pub fn formatted_request_size(&self) -> String {
        self.request_size
            .map(format_bytes)
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn formatted_response_size(&self) -> String {
        self.response_size
            .map(format_bytes)
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn formatted_duration(&self) -> String {
        match self.duration {
            Some(duration) => format!("{}ms", duration.as_millis()),
            None => "-".to_string(),
        }
    }

    pub(crate) fn matches_query(&self, query_lower: &str) -> bool {
        self.url.to_lowercase().contains(query_lower)
            || self.method.to_lowercase().contains(query_lower)
            || self.status_text().to_lowercase().contains(query_lower)
    }

    /// Single-line rendering used by the flattened export.
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {} {} {} id={} completed={} duration={} req_size={} resp_size={} req_headers={} resp_headers={} req_body={} resp_body={} error={}",
            self.started_at.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.method,
            self.status_text(),
            self.url,
            self.id,
            self.completed_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.formatted_duration(),
            self.formatted_request_size(),
            self.formatted_response_size(),
            format_fields(self.request_headers.as_ref()),
            format_fields(self.response_headers.as_ref()),
            self.request_body,
            self.response_body,
            self.error.as_deref().unwrap_or("-"),
        )
    }
}

fn format_fields(fields: Option<&FieldMap>) -> String {
    match fields {
        None => "-".to_string(),
        Some(fields) => {
            let pairs: Vec<String> = fields
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
    }
}

/// Status-based view selector for [`NetworkRecorder::filter_by_status`].
///
/// [`NetworkRecorder::filter_by_status`]: crate::network::NetworkRecorder::filter_by_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatusFilter {
    All,
    Success,
    Error,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, record: &NetworkRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Success => record.is_success(),
            StatusFilter::Error => record.is_failure(),
            StatusFilter::Pending => record.is_pending(),
        }
    }
}

/// Outcome delivered by the transport for a previously started request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub status: Option<u16>,
    pub body: Body,
    pub headers: Option<FieldMap>,
    pub duration: Option<Duration>,
    pub error: Option<String>,
}

impl Completion {
    pub fn status(code: u16) -> Self {
        Self {
            status: Some(code),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_headers(mut self, headers: FieldMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}
