use crate::utils::cors;
use thiserror::Error;
use worker::{Response, Result};

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The row changed between read and write.
    #[error("{0}")]
    Conflict(String),

    /// Missing credential or backend setting. Reported as a server fault.
    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("Gemini API authentication error. Check your API key.")]
    UpstreamAuth(String),

    #[error("Gemini API quota exceeded. Try again later.")]
    UpstreamQuota(String),

    #[error("Error generating summary")]
    UpstreamGeneric(String),

    #[error("Summary is required")]
    MissingSummary,

    #[error("Slack configuration is missing. Please check your environment.")]
    DeliveryConfigMissing,

    #[error("Error sending to Slack")]
    Delivery(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::MissingSummary | AppError::DeliveryConfigMissing => 400,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Configuration(_)
            | AppError::UpstreamAuth(_)
            | AppError::UpstreamQuota(_)
            | AppError::UpstreamGeneric(_)
            | AppError::Delivery(_)
            | AppError::Internal(_) => 500,
        }
    }

    /// Upstream detail surfaced next to the message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AppError::UpstreamAuth(m)
            | AppError::UpstreamQuota(m)
            | AppError::UpstreamGeneric(m)
            | AppError::Delivery(m) => Some(m),
            _ => None,
        }
    }

    /// Classify a failure reported by the generation service from its message.
    pub fn from_generation_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("API key") {
            AppError::UpstreamAuth(message)
        } else if message.contains("quota") {
            AppError::UpstreamQuota(message)
        } else {
            AppError::UpstreamGeneric(message)
        }
    }

    /// JSON body for this error. `trace` is only attached to internal failures.
    pub fn to_body(&self, include_trace: bool) -> serde_json::Value {
        let mut body = serde_json::json!({ "message": self.to_string() });
        if let Some(detail) = self.detail() {
            body["error"] = serde_json::Value::String(detail.to_string());
        }
        if include_trace && matches!(self, AppError::Internal(_)) {
            body["trace"] = serde_json::Value::String(format!("{:?}", self));
        }
        body
    }
}

impl From<worker::Error> for AppError {
    fn from(e: worker::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", e))
    }
}

pub fn json_error(msg: &str, status: u16, origin: &str) -> Result<Response> {
    let res = Response::from_json(&serde_json::json!({ "message": msg }))?;
    cors::add_headers(res.with_status(status), origin)
}

pub fn app_error(err: &AppError, origin: &str, include_trace: bool) -> Result<Response> {
    let res = Response::from_json(&err.to_body(include_trace))?;
    cors::add_headers(res.with_status(err.status()), origin)
}

pub fn not_found_route(origin: &str) -> Result<Response> {
    json_error("Route not found", 404, origin)
}
