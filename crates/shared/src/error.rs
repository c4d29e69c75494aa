//! Engine-wide error taxonomy.

use thiserror::Error;

/// Result type alias using `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error taxonomy.
///
/// Every fallible operation surfaces one of these four kinds:
///
/// - `Validation` - the request is malformed and will never succeed as-is
/// - `NotFound` - a referenced account, record, or client does not exist
/// - `Conflict` - the operation lost a race or the record is already matched;
///   the caller must re-read state before deciding anything
/// - `Store` - transient persistence failure; the write either fully applied
///   or not at all, so a retry is safe
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request violates a validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation conflicts with concurrent state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transient persistence failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl EngineError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns true if a blind retry of the failed operation is safe.
    ///
    /// Only `Store` errors qualify: the atomic batch either fully applied or
    /// not at all. A `Conflict` must never be blindly retried - the caller
    /// has to re-read the record first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EngineError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(EngineError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(EngineError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(EngineError::Store(String::new()).error_code(), "STORE_ERROR");
    }

    #[test]
    fn test_retryable() {
        assert!(EngineError::Store(String::new()).is_retryable());
        assert!(!EngineError::Conflict(String::new()).is_retryable());
        assert!(!EngineError::Validation(String::new()).is_retryable());
        assert!(!EngineError::NotFound(String::new()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            EngineError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            EngineError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            EngineError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
        assert_eq!(EngineError::Store("msg".into()).to_string(), "Store error: msg");
    }
}
