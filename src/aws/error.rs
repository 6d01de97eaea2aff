//! AWS API errors
//!
//! Structured error types for conditions callers need to inspect, such as a
//! service exception code or a missing resource.

use thiserror::Error;

/// Error returned by an AWS JSON service
#[derive(Debug, Clone, Error)]
#[error("{code}: {message} (HTTP {status})")]
pub struct ApiError {
    /// Exception name, without the `namespace#` prefix
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl ApiError {
    /// Build from a non-success response body.
    ///
    /// AWS JSON protocols report the exception in `__type`, sometimes as
    /// `com.amazonaws.codedeploy#DeploymentConfigDoesNotExistException`.
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or_default();

        let code = parsed
            .get("__type")
            .and_then(|v| v.as_str())
            .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
            .unwrap_or_else(|| "UnknownError".to_string());

        let message = parsed
            .get("message")
            .or_else(|| parsed.get("Message"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        Self {
            code,
            message,
            status,
        }
    }

    /// Check whether this is the named exception
    pub fn is_a(&self, code: &str) -> bool {
        self.code == code
    }
}

/// The requested resource does not exist
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// The service reported a "does not exist" exception
    #[error("couldn't find resource ({request}): {last_error}")]
    Missing { request: String, last_error: String },

    /// The call succeeded but carried no result
    #[error("empty result ({request})")]
    EmptyResult { request: String },
}

/// Check whether `err` is, or wraps, a [`NotFoundError`]
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<NotFoundError>())
}

/// Check whether `err` is, or wraps, the named service exception
pub fn is_a(err: &anyhow::Error, code: &str) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .any(|api| api.is_a(code))
}
