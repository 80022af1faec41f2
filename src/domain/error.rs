use thiserror::Error;

use super::pagination::CursorError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether a caller may safely retry the request that produced this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Order 'ord_1' not found");
        assert_eq!(error.to_string(), "Not found: Order 'ord_1' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Unknown sort field 'price'");
        assert_eq!(error.to_string(), "Validation error: Unknown sort field 'price'");
    }

    #[test]
    fn test_cursor_error_conversion() {
        let error: DomainError = CursorError::Malformed.into();
        assert!(matches!(error, DomainError::InvalidCursor(CursorError::Malformed)));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_storage_errors_are_retryable() {
        assert!(DomainError::storage("connection reset").is_retryable());
        assert!(!DomainError::not_found("gone").is_retryable());
    }
}
