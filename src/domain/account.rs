//! Account entity
//!
//! The account record as persisted by the repository. Identity fields
//! (id, customer, number, IBAN, balance, open date) are fixed at creation;
//! only the label and currency can change afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identifier::derive_iban;

use super::DomainError;

/// Currency codes accepted for account opening and update
pub const RECOGNIZED_CURRENCIES: &[&str] = &["TRY", "USD", "EUR", "GBP", "CHF", "JPY"];

/// Validate a currency code against the recognized set
pub fn validate_currency(code: &str) -> Result<(), DomainError> {
    if RECOGNIZED_CURRENCIES.contains(&code) {
        Ok(())
    } else {
        Err(DomainError::InvalidCurrency(code.to_string()))
    }
}

/// Account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID, assigned at creation
    pub id: Uuid,

    /// Owner customer ID
    pub customer_id: Uuid,

    /// Account label, mutable
    pub name: String,

    /// Currency code, mutable
    pub currency_code: String,

    /// Globally unique 7-digit number
    pub account_number: i64,

    /// Derived from the account number; re-derivable, never authoritative
    pub iban: String,

    /// Fixed at zero on creation
    pub balance: Decimal,

    /// Set at the moment of persistence
    pub open_date: DateTime<Utc>,
}

impl Account {
    /// Open a new account with the given allocated number.
    /// Balance starts at zero and the IBAN is derived from the number.
    pub fn open(
        customer_id: Uuid,
        name: String,
        currency_code: String,
        account_number: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            name,
            currency_code,
            account_number,
            iban: derive_iban(account_number),
            balance: Decimal::ZERO,
            open_date: Utc::now(),
        }
    }

    /// Merge update changes into the record.
    /// Identity fields are untouchable by construction.
    pub fn apply(&mut self, changes: &AccountChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(currency_code) = &changes.currency_code {
            self.currency_code = currency_code.clone();
        }
    }
}

/// Non-identity fields an update command may change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub currency_code: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.currency_code.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_sets_zero_balance_and_derived_iban() {
        let before = Utc::now();
        let account = Account::open(
            Uuid::new_v4(),
            "Salary".to_string(),
            "USD".to_string(),
            1234567,
        );

        assert_eq!(account.balance, dec!(0));
        assert_eq!(account.account_number, 1234567);
        assert_eq!(account.iban, derive_iban(1234567));
        assert!(account.open_date >= before);
    }

    #[test]
    fn test_apply_preserves_identity_fields() {
        let mut account = Account::open(
            Uuid::new_v4(),
            "Salary".to_string(),
            "USD".to_string(),
            7654321,
        );
        let id = account.id;
        let number = account.account_number;
        let iban = account.iban.clone();

        account.apply(&AccountChanges {
            name: Some("Savings".to_string()),
            currency_code: Some("EUR".to_string()),
        });

        assert_eq!(account.name, "Savings");
        assert_eq!(account.currency_code, "EUR");
        assert_eq!(account.id, id);
        assert_eq!(account.account_number, number);
        assert_eq!(account.iban, iban);
    }

    #[test]
    fn test_apply_skips_absent_fields() {
        let mut account = Account::open(
            Uuid::new_v4(),
            "Salary".to_string(),
            "USD".to_string(),
            1111111,
        );

        account.apply(&AccountChanges {
            name: Some("Main".to_string()),
            currency_code: None,
        });

        assert_eq!(account.name, "Main");
        assert_eq!(account.currency_code, "USD");
    }

    #[test]
    fn test_validate_currency() {
        assert!(validate_currency("USD").is_ok());
        assert!(validate_currency("TRY").is_ok());

        let err = validate_currency("DOGE").unwrap_err();
        assert_eq!(err, DomainError::InvalidCurrency("DOGE".to_string()));
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(AccountChanges::default().is_empty());
        assert!(!AccountChanges {
            name: Some("x".to_string()),
            currency_code: None,
        }
        .is_empty());
    }
}
