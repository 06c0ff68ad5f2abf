//! Account Repository
//!
//! Durable store of account records. Mutations are bound to the caller's
//! unit of work; reads outside a command use the pool directly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Account;
use crate::uow::UnitOfWork;

type AccountRow = (
    Uuid,
    Uuid,
    String,
    String,
    i64,
    String,
    Decimal,
    DateTime<Utc>,
);

fn from_row(row: AccountRow) -> Account {
    let (id, customer_id, name, currency_code, account_number, iban, balance, open_date) = row;
    Account {
        id,
        customer_id,
        name,
        currency_code,
        account_number,
        iban,
        balance,
        open_date,
    }
}

const SELECT_COLUMNS: &str =
    "id, customer_id, name, currency_code, account_number, iban, balance, open_date";

/// Repository for account records
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new AccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up an account by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// Look up an account by id within a unit of work, taking a row lock
    /// so concurrent updates to the same account serialize.
    pub async fn get_by_id_locked(
        &self,
        uow: &mut UnitOfWork,
        id: Uuid,
    ) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **uow.tx())
        .await?;

        Ok(row.map(from_row))
    }

    /// Check whether an account number is already taken.
    /// Runs inside the unit of work so the check and the insert that follows
    /// see the same snapshot.
    pub async fn exists_by_number(
        &self,
        uow: &mut UnitOfWork,
        account_number: i64,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE account_number = $1)")
                .bind(account_number)
                .fetch_one(&mut **uow.tx())
                .await?;

        Ok(exists)
    }

    /// Insert a new account within the unit of work
    pub async fn insert(&self, uow: &mut UnitOfWork, account: &Account) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, customer_id, name, currency_code,
                account_number, iban, balance, open_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id)
        .bind(account.customer_id)
        .bind(&account.name)
        .bind(&account.currency_code)
        .bind(account.account_number)
        .bind(&account.iban)
        .bind(account.balance)
        .bind(account.open_date)
        .execute(&mut **uow.tx())
        .await?;

        Ok(())
    }

    /// Persist the mutable fields of an account within the unit of work.
    /// Identity fields are never part of the statement.
    pub async fn update(&self, uow: &mut UnitOfWork, account: &Account) -> Result<u64, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            UPDATE accounts
            SET name = $2, currency_code = $3
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.currency_code)
        .execute(&mut **uow.tx())
        .await?
        .rows_affected();

        Ok(rows)
    }

    /// Remove an account by id within the unit of work
    pub async fn delete(&self, uow: &mut UnitOfWork, id: Uuid) -> Result<u64, sqlx::Error> {
        let rows = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut **uow.tx())
            .await?
            .rows_affected();

        Ok(rows)
    }
}
