//! Error types for the DocumentCloud client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

/// Errors surfaced by the client and the records it produces.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// An authenticated operation was attempted without credentials
    #[error(
        "this request requires credentials; provide a username and password \
         when constructing the client"
    )]
    CredentialsMissing,

    /// The service rejected the configured credentials (401 response)
    #[error("credentials rejected: {message}")]
    CredentialsRejected {
        /// Response body or message
        message: String,
    },

    /// Resource not found (404 response, or a local lookup with zero matches)
    #[error("does not exist: {resource}")]
    DoesNotExist {
        /// Description of the missing resource
        resource: String,
    },

    /// A local uniqueness invariant was violated
    #[error("duplicate object: {message}")]
    DuplicateObject {
        /// What collided
        message: String,
    },

    /// Malformed caller input
    #[error("invalid value for '{field}': {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON parsing error
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Local file error (uploads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server error (5xx response), surfaced after retry exhaustion
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::DoesNotExist { resource: resource.into() }
    }

    /// Create a duplicate object error.
    #[must_use]
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::DuplicateObject { message: message.into() }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if this error is worth retrying at a higher level.
    ///
    /// 404 and 401 are definitive outcomes and are never retried; the
    /// transport already retried transient failures before surfacing them.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitive_errors_not_retryable() {
        assert!(!ClientError::not_found("documents/missing.json").is_retryable());
        assert!(!ClientError::CredentialsMissing.is_retryable());
        assert!(
            !ClientError::CredentialsRejected { message: "401".to_string() }.is_retryable()
        );
        assert!(!ClientError::validation("mentions", "too many").is_retryable());
    }

    #[test]
    fn test_server_error_retryable() {
        assert!(ClientError::server(502, "Bad Gateway").is_retryable());
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = ClientError::validation("data", "keys must be strings");
        let msg = err.to_string();
        assert!(msg.contains("data"));
        assert!(msg.contains("keys must be strings"));
    }

    #[test]
    fn test_duplicate_display() {
        let err = ClientError::duplicate("document 12-a already in the set");
        assert!(err.to_string().contains("duplicate object"));
    }
}
