//! Notification message contract
//!
//! Schema published to the email channel. Field names are externally
//! documented and must remain backward compatible for independent consumers.

use serde::{Deserialize, Serialize};

use crate::domain::Customer;

/// Channel the email consumer listens on
pub const EMAIL_CHANNEL: &str = "emailQueue";

/// Message handed to the email consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Compose the "account opened" notification
    pub fn account_opened(customer: &Customer, currency_code: &str) -> Self {
        Self {
            recipient_email: customer.email.clone(),
            subject: "New account opened".to_string(),
            body: format!(
                "Hello {}, your {} currency account has been opened.",
                customer.full_name(),
                currency_code
            ),
        }
    }

    /// Compose the "account updated" notification
    pub fn account_updated(customer: &Customer, account_number: i64) -> Self {
        Self {
            recipient_email: customer.email.clone(),
            subject: "Account details updated".to_string(),
            body: format!(
                "Hello {}, the details of your account {} have been updated.",
                customer.full_name(),
                account_number
            ),
        }
    }

    /// Compose the "account closed" notification
    pub fn account_closed(customer: &Customer, account_number: i64) -> Self {
        Self {
            recipient_email: customer.email.clone(),
            subject: "Account closed".to_string(),
            body: format!(
                "Hello {}, your account {} has been closed.",
                customer.full_name(),
                account_number
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn customer() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_account_opened_content() {
        let message = EmailMessage::account_opened(&customer(), "USD");

        assert_eq!(message.recipient_email, "ada@example.com");
        assert!(message.body.contains("Ada Lovelace"));
        assert!(message.body.contains("USD"));
    }

    #[test]
    fn test_wire_field_names_are_stable() {
        let message = EmailMessage::account_opened(&customer(), "EUR");
        let json = serde_json::to_value(&message).unwrap();

        // Consumers depend on these exact keys
        assert!(json.get("recipientEmail").is_some());
        assert!(json.get("subject").is_some());
        assert!(json.get("body").is_some());
    }

    #[test]
    fn test_round_trip() {
        let message = EmailMessage::account_closed(&customer(), 1234567);
        let json = serde_json::to_string(&message).unwrap();
        let back: EmailMessage = serde_json::from_str(&json).unwrap();

        assert_eq!(back, message);
    }
}
