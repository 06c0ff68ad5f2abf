//! Update Account Handler
//!
//! Merges non-identity fields into an existing account. Updating a missing
//! account fails with NotFound rather than upserting.

use sqlx::PgPool;

use crate::config::NotificationPolicy;
use crate::domain::{validate_currency, DomainError};
use crate::error::AppError;
use crate::outbox::{EmailMessage, OutboxRepository, EMAIL_CHANNEL};
use crate::repository::{AccountRepository, CustomerRepository};
use crate::uow::UnitOfWork;

use super::UpdateAccountCommand;

/// Handler for account updates
pub struct UpdateAccountHandler {
    accounts: AccountRepository,
    customers: CustomerRepository,
    outbox: OutboxRepository,
    pool: PgPool,
    policy: NotificationPolicy,
}

impl UpdateAccountHandler {
    pub fn new(pool: PgPool, policy: NotificationPolicy) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            customers: CustomerRepository::new(pool.clone()),
            outbox: OutboxRepository::new(pool.clone()),
            pool,
            policy,
        }
    }

    /// Execute the update account command
    pub async fn execute(&self, command: UpdateAccountCommand) -> Result<(), AppError> {
        if command.changes.is_empty() {
            return Err(DomainError::EmptyChanges.into());
        }
        if let Some(currency_code) = &command.changes.currency_code {
            validate_currency(currency_code)?;
        }

        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let mut account = self
            .accounts
            .get_by_id_locked(&mut uow, command.account_id)
            .await?
            .ok_or(AppError::AccountNotFound(command.account_id))?;

        account.apply(&command.changes);
        self.accounts.update(&mut uow, &account).await?;

        if self.policy.on_update {
            match self.customers.get_by_id(account.customer_id).await? {
                Some(customer) => {
                    let message =
                        EmailMessage::account_updated(&customer, account.account_number);
                    self.outbox
                        .enqueue(&mut uow, EMAIL_CHANNEL, &message)
                        .await?;
                }
                None => {
                    // Dangling owner; the update itself still applies
                    tracing::warn!(
                        customer_id = %account.customer_id,
                        "Owner not found, skipping update notification"
                    );
                }
            }
        }

        uow.complete().await?;

        tracing::info!(
            account_id = %command.account_id,
            "Account updated"
        );

        Ok(())
    }
}
