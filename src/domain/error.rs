//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Business rule violations and domain invariant failures.
/// Independent of the storage and broker layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Currency code outside the recognized set
    #[error("Unrecognized currency code: {0}")]
    InvalidCurrency(String),

    /// Account label missing or blank
    #[error("Account name must not be empty")]
    EmptyAccountName,

    /// Update command with no fields to change
    #[error("Update carries no changes")]
    EmptyChanges,

    /// Free account number could not be allocated
    #[error("Account number space exhausted after {attempts} attempts")]
    AccountNumberExhausted { attempts: u32 },
}

impl DomainError {
    /// Check if this is a validation error (fails fast, no side effects)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCurrency(_) | Self::EmptyAccountName | Self::EmptyChanges
        )
    }

    /// Check if this is a conflict error (retry may help)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AccountNumberExhausted { .. })
    }
}
