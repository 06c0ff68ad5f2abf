//! Command definitions
//!
//! Commands represent intentions to change the system state. Each is a
//! self-contained, immutable value carrying no implicit context.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Account, AccountChanges};
use crate::error::AppError;

// =========================================================================
// CreateAccountCommand
// =========================================================================

/// Command to open a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountCommand {
    pub customer_id: Uuid,
    pub currency_code: String,
    pub name: String,
}

impl CreateAccountCommand {
    pub fn new(customer_id: Uuid, currency_code: String, name: String) -> Self {
        Self {
            customer_id,
            currency_code,
            name,
        }
    }
}

// =========================================================================
// UpdateAccountCommand
// =========================================================================

/// Command to change an account's non-identity fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAccountCommand {
    pub account_id: Uuid,
    pub changes: AccountChanges,
}

impl UpdateAccountCommand {
    pub fn new(account_id: Uuid, changes: AccountChanges) -> Self {
        Self {
            account_id,
            changes,
        }
    }
}

// =========================================================================
// DeleteAccountCommand
// =========================================================================

/// Command to remove an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountCommand {
    pub account_id: Uuid,
}

impl DeleteAccountCommand {
    pub fn new(account_id: Uuid) -> Self {
        Self { account_id }
    }
}

// =========================================================================
// AccountProjection
// =========================================================================

/// Projection of a persisted account returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProjection {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub currency_code: String,
    pub account_number: i64,
    pub iban: String,
    pub balance: Decimal,
    pub open_date: DateTime<Utc>,
}

impl From<&Account> for AccountProjection {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            customer_id: account.customer_id,
            name: account.name.clone(),
            currency_code: account.currency_code.clone(),
            account_number: account.account_number,
            iban: account.iban.clone(),
            balance: account.balance,
            open_date: account.open_date,
        }
    }
}

// =========================================================================
// Response envelope
// =========================================================================

/// Failure descriptor carried by the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: String,
    pub message: String,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind().as_str().to_string(),
            message: err.to_string(),
        }
    }
}

/// Uniform response shape for every command kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Successful command with a payload
    pub fn success(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    /// Successful command with an empty payload
    pub fn success_empty() -> Self {
        Self {
            success: true,
            payload: None,
            error: None,
        }
    }

    /// Failed command
    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(ApiError::from(err)),
        }
    }
}
