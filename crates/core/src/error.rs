use std::fmt;

use serde::Deserialize;
use thiserror::Error;

pub const HEAVY_LOAD_MESSAGE: &str = "The AI server is currently under heavy load and all retry attempts failed. Please wait a minute and try again.";

pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred during analysis.";

#[derive(Error, Debug)]
pub enum FcktyError {
    #[error("Service not configured: set one of {env_vars} to your API key")]
    NotConfigured { env_vars: String },

    #[error(
        "Failed to parse analysis results. The video might be too obscure to analyze via Search."
    )]
    NoParseableResult,

    #[error("Malformed analysis result: {0}")]
    MalformedResult(#[source] serde_json::Error),

    #[error("{0}")]
    Service(ServiceError),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FcktyError>;

/// Error reported by the generation service itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// Decode a non-success response body, keeping the raw body when it is
    /// not the usual `{"error": {...}}` envelope.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self {
                status: Some(envelope.error.code.unwrap_or(status)),
                code: envelope.error.status,
                message: envelope
                    .error
                    .message
                    .unwrap_or_else(|| format!("HTTP {status}")),
            },
            Err(_) => Self {
                status: Some(status),
                code: None,
                message: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    pub fn is_overloaded(&self) -> bool {
        matches!(self.status, Some(429 | 503))
            || matches!(
                self.code.as_deref(),
                Some("RESOURCE_EXHAUSTED" | "UNAVAILABLE")
            )
            || mentions_overload(&self.message)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServiceError {}

fn mentions_overload(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("overloaded") || lower.contains("resource")
}

impl FcktyError {
    pub fn is_overloaded(&self) -> bool {
        match self {
            FcktyError::Service(err) => err.is_overloaded(),
            FcktyError::Api(err) => {
                err.status().is_some_and(|s| matches!(s.as_u16(), 429 | 503))
                    || mentions_overload(&err.to_string())
            }
            _ => false,
        }
    }
}

/// Text shown to the user when an analysis fails.
pub fn user_message(err: &FcktyError) -> String {
    if err.is_overloaded() {
        return HEAVY_LOAD_MESSAGE.to_string();
    }
    let text = err.to_string();
    if text.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overload_message_replaces_raw_text() {
        let err = FcktyError::Service(ServiceError::new("Error: model overloaded, try later"));
        assert_eq!(user_message(&err), HEAVY_LOAD_MESSAGE);
    }

    #[test]
    fn resource_exhausted_is_overload_by_code() {
        let body = r#"{"error":{"code":429,"message":"Quota hit","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = ServiceError::from_response(429, body);
        assert_eq!(err.code.as_deref(), Some("RESOURCE_EXHAUSTED"));
        assert_eq!(err.message, "Quota hit");
        assert!(err.is_overloaded());
    }

    #[test]
    fn plain_failures_surface_their_message() {
        let err = FcktyError::Service(ServiceError::from_response(
            400,
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
        ));
        assert!(!err.is_overloaded());
        assert_eq!(user_message(&err), "API key not valid");
    }

    #[test]
    fn non_envelope_body_is_kept() {
        let err = ServiceError::from_response(502, "  bad gateway ");
        assert_eq!(err.status, Some(502));
        assert_eq!(err.message, "bad gateway");

        let empty = ServiceError::from_response(500, "");
        assert_eq!(empty.message, "HTTP 500");
    }

    #[test]
    fn empty_message_falls_back_to_generic_text() {
        let err = FcktyError::Service(ServiceError::new(""));
        assert_eq!(user_message(&err), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn parse_failures_are_not_overloads() {
        assert!(!FcktyError::NoParseableResult.is_overloaded());
        assert!(user_message(&FcktyError::NoParseableResult).starts_with("Failed to parse"));
    }
}
