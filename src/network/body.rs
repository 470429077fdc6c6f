use serde::{Deserialize, Serialize};
use std::fmt;

/// Request or response payload as seen by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Body {
    #[default]
    Absent,
    Text(String),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

impl Body {
    /// Converts any serializable value into a structured body. A value that
    /// cannot be represented as JSON is recorded as absent.
    pub fn structured<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Body::Json(value),
            Err(err) => {
                tracing::debug!(error = %err, "body is not serializable, recording as absent");
                Body::Absent
            }
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Body::Absent)
    }

    /// Wire size estimate in bytes. `None` when there is no body or its size
    /// cannot be determined.
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            Body::Absent => None,
            Body::Text(text) => Some(text.len() as u64),
            Body::Json(value) => serde_json::to_vec(value).ok().map(|v| v.len() as u64),
            Body::Bytes(bytes) => Some(bytes.len() as u64),
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Absent => write!(f, "-"),
            Body::Text(text) => write!(f, "{}", text.replace('\n', "\\n")),
            Body::Json(value) => write!(f, "{}", value),
            Body::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}
