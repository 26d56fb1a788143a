use serde_json::Value;
use thiserror::Error;

/// Error depicting errors that occur while fetching forecasts from the upstream API
///
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("StatusError: {status}: {message}")]
    StatusError {
        status: u16,
        message: String,
        body: Value,
    },
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("DocumentError: {0}")]
    DocumentError(String),
}

impl ForecastError {
    /// Builds a status error from an upstream non-2xx response
    ///
    /// The message is taken from the body's `message` field when the body is JSON carrying one,
    /// otherwise the canonical reason for the status is used.
    ///
    /// # Arguments
    ///
    /// * 'status' - the upstream status code
    /// * 'canonical_reason' - the reason phrase for the status, if any
    /// * 'text' - the raw response body, empty if it couldn't be read
    pub fn from_status(status: u16, canonical_reason: Option<&str>, text: &str) -> ForecastError {
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str::<Value>(text)
                .unwrap_or_else(|_| Value::String(text.to_string()))
        };

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| canonical_reason.map(str::to_string))
            .unwrap_or_else(|| format!("upstream responded with status {}", status));

        ForecastError::StatusError { status, message, body }
    }
}
