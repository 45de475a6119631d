//! Error types for grocefy.

use thiserror::Error;

/// Main error type for grocefy operations.
#[derive(Error, Debug)]
pub enum GrocefyError {
    /// Storage key contains characters that cannot be mapped to a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Stored session record is valid JSON but not a session object.
    #[error("malformed session record: {0}")]
    MalformedSession(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Convenience Result type for grocefy operations.
pub type Result<T> = std::result::Result<T, GrocefyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_session_display() {
        let err = GrocefyError::MalformedSession("expected a JSON object".into());
        assert!(err.to_string().contains("malformed session record"));
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_invalid_key_display() {
        let err = GrocefyError::InvalidKey("../etc".into());
        assert!(err.to_string().contains("../etc"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GrocefyError = io_err.into();
        assert!(matches!(err, GrocefyError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GrocefyError = json_err.into();
        assert!(matches!(err, GrocefyError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }
}
