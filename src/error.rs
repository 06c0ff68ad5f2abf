//! Error handling module
//!
//! Centralized error types and the classification used by the response
//! envelope.

use uuid::Uuid;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Outbox error: {0}")]
    Outbox(#[from] crate::outbox::OutboxError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error classification surfaced in the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing command fields; no side effects
    Validation,
    /// Referenced customer or account does not exist
    NotFound,
    /// Identifier collision persisted past the retry ceiling
    Conflict,
    /// Storage commit failed; transaction rolled back
    Persistence,
    /// Everything else
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Persistence => "persistence",
            ErrorKind::Internal => "internal",
        }
    }
}

impl AppError {
    /// Classify the error for the response envelope
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::CustomerNotFound(_) | AppError::AccountNotFound(_) => ErrorKind::NotFound,
            AppError::Domain(e) if e.is_validation() => ErrorKind::Validation,
            AppError::Domain(e) if e.is_conflict() => ErrorKind::Conflict,
            AppError::Domain(_) => ErrorKind::Validation,
            AppError::Database(_) | AppError::Outbox(_) => ErrorKind::Persistence,
            AppError::Config(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_kind_mapping() {
        let err = AppError::CustomerNotFound(Uuid::nil());
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = AppError::Domain(DomainError::InvalidCurrency("XYZ".to_string()));
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = AppError::Domain(DomainError::AccountNumberExhausted { attempts: 10 });
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
        assert_eq!(ErrorKind::Conflict.as_str(), "conflict");
        assert_eq!(ErrorKind::Persistence.as_str(), "persistence");
        assert_eq!(ErrorKind::Internal.as_str(), "internal");
    }
}
