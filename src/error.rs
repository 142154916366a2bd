use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::utils::current_database_datetime;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    BadRequest(String),
    Internal(String),
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::BadRequest(e) => write!(f, "Bad request: {}", e),
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Whether an error envelope reports an absence or a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Body shared by every non-2xx response.
///
/// `area` and `operation` are omitted for errors raised outside a resource
/// handler (unknown route, authentication).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    #[serde(rename = "type")]
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub message: String,
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub severity: Severity,
    pub area: Option<String>,
    pub operation: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            status,
            severity,
            area: None,
            operation: None,
            message: message.into(),
        }
    }

    /// A record that does not exist. Reported as a warning, never as a fault.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, Severity::Warning, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Severity::Error, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            Severity::Error,
            "Authentication required",
        )
    }

    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, Severity::Error, "Route not found")
    }

    /// Storage or other operational fault. The detail goes to the log only.
    pub fn fault(err: &AppError, message: impl Into<String>) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Severity::Error, message)
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            code: self.status.as_u16(),
            severity: self.severity,
            area: self.area.clone(),
            operation: self.operation.clone(),
            message: self.message.clone(),
            date: current_database_datetime(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope())).into_response()
    }
}
