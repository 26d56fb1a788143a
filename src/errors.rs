use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use crate::manager_forecast::errors::ForecastError;
use crate::transformer::TransformError;

/// Error depicting everything that can end a request with a non-2xx response
///
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("ConfigurationError: CWA_API_KEY is not set")]
    ConfigurationError,
    #[error("UpstreamError: {status}: {message}")]
    UpstreamError {
        status: u16,
        message: String,
        details: Value,
    },
    #[error("NetworkError: {0}")]
    NetworkError(String),
    #[error("DocumentError: {0}")]
    DocumentError(String),
    #[error("NoDataError")]
    NoDataError,
    #[error("TimeWindowError: {0}")]
    TimeWindowError(String),
    #[error("InternalError: {0}")]
    InternalError(String),
    #[error("RouteNotFound")]
    RouteNotFound,
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    fn new(error: &str, message: impl Into<String>) -> ErrorBody {
        ErrorBody { error: error.to_string(), message: Some(message.into()), details: None }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UpstreamError { status, .. } => StatusCode::from_u16(*status)
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::NoDataError | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::TimeWindowError(_) => StatusCode::BAD_GATEWAY,
            ApiError::ConfigurationError
            | ApiError::NetworkError(_)
            | ApiError::DocumentError(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the JSON body sent to the client
    ///
    /// Network and document errors only carry a generic message, their detail stays in the log.
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::ConfigurationError =>
                ErrorBody::new("伺服器設定錯誤", "請設定 CWA_API_KEY 環境變數"),
            ApiError::UpstreamError { message, details, .. } => ErrorBody {
                error: "CWA API 錯誤".to_string(),
                message: Some(message.clone()),
                details: Some(details.clone()),
            },
            ApiError::NetworkError(_) | ApiError::DocumentError(_) =>
                ErrorBody::new("伺服器錯誤", "無法取得天氣資料，請稍後再試"),
            ApiError::NoDataError =>
                ErrorBody::new("查無資料", "無法取得天氣資料"),
            ApiError::TimeWindowError(detail) =>
                ErrorBody::new("上游資料格式錯誤", detail.clone()),
            ApiError::InternalError(message) =>
                ErrorBody::new("伺服器內部錯誤", message.clone()),
            ApiError::RouteNotFound =>
                ErrorBody { error: "not found".to_string(), message: None, details: None },
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        match e {
            ForecastError::StatusError { status, message, body } =>
                ApiError::UpstreamError { status, message, details: body },
            ForecastError::NetworkError(e) => ApiError::NetworkError(e.to_string()),
            ForecastError::DocumentError(e) => ApiError::DocumentError(e),
        }
    }
}

impl From<TransformError> for ApiError {
    fn from(e: TransformError) -> Self {
        match e {
            TransformError::NoData => ApiError::NoDataError,
            e @ TransformError::TimeWindowMismatch { .. } => ApiError::TimeWindowError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        } else if !matches!(self, ApiError::RouteNotFound) {
            warn!("request failed: {}", self);
        }

        (status, Json(self.body())).into_response()
    }
}
