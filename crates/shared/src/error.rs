use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the backend on non-2xx responses.
///
/// `detail` is a plain string for lookups that miss and a list of objects for
/// request validation failures, so it is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    #[error("citation metadata is missing `{0}`")]
    MissingField(&'static str),
    #[error("citation chapter is empty")]
    EmptyChapter,
    #[error("citation field `{field}` has unsupported value {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("citation number must be a positive integer, got {0}")]
    NonPositiveNumber(String),
}
