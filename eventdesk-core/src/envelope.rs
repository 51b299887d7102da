//! The `{data, error}` wrapper every backend endpoint answers with.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::ApiError;
use crate::batch::BatchResult;

/// Error half of the envelope.
///
/// `detail` is usually a sentence, but field validation failures arrive as
/// nested maps and lists of messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub detail: Value,
}

impl ErrorDetail {
    pub fn new(code: &str, detail: impl Into<String>) -> Self {
        ErrorDetail {
            code: Some(code.to_string()),
            detail: Value::String(detail.into()),
        }
    }

    /// Human-readable rendering of `detail`.
    pub fn message(&self) -> String {
        let message = flatten_detail(&self.detail);
        if message.is_empty() {
            match &self.code {
                Some(code) => format!("Request failed ({code})"),
                None => "Request failed".to_string(),
            }
        } else {
            message
        }
    }
}

fn flatten_detail(detail: &Value) -> String {
    match detail {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(flatten_detail)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(fields) => fields
            .iter()
            .filter_map(|(field, value)| {
                let inner = flatten_detail(value);
                (!inner.is_empty()).then(|| format!("{field}: {inner}"))
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Raw envelope; `data` stays untyped until the caller knows what it expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

impl Envelope {
    pub fn success(data: impl Serialize) -> Self {
        Envelope {
            data: serde_json::to_value(data).ok(),
            error: None,
        }
    }

    pub fn failure(error: ErrorDetail) -> Self {
        Envelope {
            data: None,
            error: Some(error),
        }
    }

    /// A populated `error` wins; otherwise `data` must decode as `T`.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::Backend(error));
        }
        serde_json::from_value(self.data.unwrap_or(Value::Null))
            .map_err(|e| ApiError::Transport(format!("Unexpected response payload: {e}")))
    }

    /// Like `into_result`, except counts in `data` win over a populated
    /// `error`: the backend reports "No records added" together with them.
    pub fn into_batch_result(self) -> Result<BatchResult, ApiError> {
        if let Some(result) = self
            .data
            .clone()
            .and_then(|data| serde_json::from_value::<BatchResult>(data).ok())
        {
            if let Some(error) = &self.error {
                debug!(detail = %error.message(), "batch envelope carried counts and an error");
            }
            return Ok(result);
        }
        self.into_result()
    }

    /// Success means "no error", whatever `data` holds.
    pub fn into_ack(self) -> Result<(), ApiError> {
        match self.error {
            Some(error) => Err(ApiError::Backend(error)),
            None => Ok(()),
        }
    }
}
