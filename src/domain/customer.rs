//! Customer read model
//!
//! Customers are owned by an upstream service; this core never mutates them.
//! Only the fields needed to compose notification content are carried.

use uuid::Uuid;

/// Customer as read from the customer store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    /// Display name used in notification bodies
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
