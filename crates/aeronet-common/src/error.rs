//! Error types for AOD explorer crates.

use thiserror::Error;

/// Result type alias using AeronetError.
pub type AeronetResult<T> = Result<T, AeronetError>;

/// Broad classification of an error, used to decide how it is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid user input, caught before any network call.
    Validation,
    /// Network or service failure; the user may retry.
    Retrieval,
    /// Malformed or unexpected response content; not retried.
    Parse,
    /// Local failures (cache directory, rendering).
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Retrieval => "retrieval",
            ErrorKind::Parse => "parse",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Primary error type for data access, caching and rendering.
#[derive(Debug, Error)]
pub enum AeronetError {
    // === Validation Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid date range: start date {start} is after end date {end}")]
    EmptyDateRange { start: String, end: String },

    #[error("Unknown AERONET site: {0}")]
    UnknownSite(String),

    // === Retrieval Errors ===
    #[error("Failed to fetch data: {0}")]
    Retrieval(String),

    #[error("AERONET service returned HTTP status {0}")]
    HttpStatus(u16),

    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),

    // === Parse Errors ===
    #[error("Missing expected column: {0}")]
    MissingColumn(String),

    #[error("Failed to parse data line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    // === Infrastructure Errors ===
    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AeronetError {
    /// Shorthand for an invalid parameter error.
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        AeronetError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AeronetError::MissingParameter(_)
            | AeronetError::InvalidParameter { .. }
            | AeronetError::EmptyDateRange { .. }
            | AeronetError::UnknownSite(_) => ErrorKind::Validation,

            AeronetError::Retrieval(_)
            | AeronetError::HttpStatus(_)
            | AeronetError::UnexpectedFormat(_) => ErrorKind::Retrieval,

            AeronetError::MissingColumn(_) | AeronetError::MalformedRow { .. } => ErrorKind::Parse,

            AeronetError::CacheError(_)
            | AeronetError::RenderError(_)
            | AeronetError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Only network/service failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Retrieval
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Retrieval | ErrorKind::Parse => 502,
            ErrorKind::Internal => 500,
        }
    }

    /// Message shown to the user of the explorer.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Retrieval => format!("{}. Please try again.", self),
            _ => self.to_string(),
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for AeronetError {
    fn from(err: std::io::Error) -> Self {
        AeronetError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for AeronetError {
    fn from(err: serde_json::Error) -> Self {
        AeronetError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(AeronetError::UnknownSite("X".into()).kind(), ErrorKind::Validation);
        assert_eq!(AeronetError::HttpStatus(503).kind(), ErrorKind::Retrieval);
        assert_eq!(AeronetError::MissingColumn("Time".into()).kind(), ErrorKind::Parse);
        assert_eq!(AeronetError::CacheError("disk".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_only_retrieval_is_retryable() {
        assert!(AeronetError::Retrieval("timeout".into()).is_retryable());
        assert!(!AeronetError::MissingColumn("AOD".into()).is_retryable());
        assert!(!AeronetError::invalid("level", "bad").is_retryable());
    }

    #[test]
    fn test_http_status_codes() {
        let err = AeronetError::EmptyDateRange {
            start: "2024-02-01".into(),
            end: "2024-01-01".into(),
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(AeronetError::UnexpectedFormat("html".into()).http_status_code(), 502);
        assert_eq!(AeronetError::RenderError("pixmap".into()).http_status_code(), 500);
    }

    #[test]
    fn test_retrieval_user_message_suggests_retry() {
        let msg = AeronetError::HttpStatus(500).user_message();
        assert!(msg.contains("try again"));
    }
}
