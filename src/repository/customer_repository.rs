//! Customer Repository
//!
//! Read-only access to customer records, used to resolve the notification
//! recipient. This core never mutates customers.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Customer;

/// Repository for reading customer records
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new CustomerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a customer by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
        let row: Option<(Uuid, String, String, String)> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, first_name, last_name, email)| Customer {
            id,
            first_name,
            last_name,
            email,
        }))
    }
}
