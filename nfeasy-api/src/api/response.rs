//! Response envelope and error mapping
//!
//! Every API response is `{success, data?, message?, total?, timestamp}`.
//! Errors add an `error` field carrying the stable error kind.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use nfeasy_common::time::now;
use nfeasy_common::Error;
use serde::Serialize;
use serde_json::json;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            total: None,
            timestamp: now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }
}

/// Result type returned by JSON handlers
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Error returned by handlers, rendered in the response envelope
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            err if err.is_not_found() => StatusCode::NOT_FOUND,
            Error::InvalidStatus(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({
            "success": false,
            "message": self.0.to_string(),
            "error": self.0.kind(),
            "timestamp": now(),
        }));

        (status, body).into_response()
    }
}

/// Require a field that serde left optional so the error lands in the envelope
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError(Error::InvalidInput(format!("{} is required", field))))
}
