//! Repositories
//!
//! Durable stores for accounts and the read-only customer lookup.

mod account_repository;
mod customer_repository;

pub use account_repository::AccountRepository;
pub use customer_repository::CustomerRepository;

/// Check whether a sqlx error is a Postgres unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}
