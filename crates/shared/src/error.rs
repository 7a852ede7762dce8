use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by the API when a request is rejected.
///
/// `detail` is usually a string, but validation failures carry a structured
/// value; only the string form is meant for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorResponse {
    pub fn detail_message(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(detail)) if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }
}
